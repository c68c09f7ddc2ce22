use carrent_client::rent::{RentalCatalog, RentalForm, submit_rental};
use carrent_client::route::AppRoute;
use carrent_shared::pricing::format_vnd;
use carrent_shared::{User, ValidationError};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::AuthContext;
use crate::components::toast::{Toast, ToastView};
use crate::web::router::RouterService;

/// 新建租车合同
#[component]
pub fn RentPage(auth: AuthContext, router: RouterService) -> impl IntoView {
    let toast = Toast::new();
    let catalog = RwSignal::new(Option::<RentalCatalog>::None);
    let form = RwSignal::new(RentalForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    {
        let api = auth.api();
        spawn_local(async move {
            match RentalCatalog::load(&api).await {
                Ok(loaded) => catalog.set(Some(loaded)),
                Err(e) => {
                    catalog.set(Some(RentalCatalog::default()));
                    toast.error(format!("Không tải được danh sách xe: {}", e));
                }
            }
        });
    }

    let estimate = move || {
        catalog.with(|c| {
            c.as_ref()
                .and_then(|c| form.with(|f| f.estimate(c)))
        })
    };

    let set_date = move |raw: String, apply: fn(&mut RentalForm, &str) -> Result<(), ValidationError>| {
        if let Some(Err(e)) = form.try_update(|f| apply(f, &raw)) {
            set_error_msg.set(Some(e.to_string()));
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(user) = auth.user_untracked() else {
            return;
        };
        let Some(current) = catalog.get_untracked() else {
            return;
        };
        let draft = form.get_untracked();

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = auth.api();
        spawn_local(async move {
            match submit_rental(&api, &user, &draft, &current).await {
                Ok(_) => {
                    set_is_submitting.set(false);
                    router.navigate(AppRoute::UserDashboard);
                }
                Err(e) => {
                    set_is_submitting.set(false);
                    set_error_msg.set(Some(e.to_string()));
                }
            }
        });
    };

    let info_row = move |label: &'static str, value: fn(&User) -> String| {
        view! {
            <div class="flex justify-between py-1">
                <span class="text-base-content/70">{label}</span>
                <span class="font-semibold">{move || auth.user().map(|u| value(&u)).unwrap_or_default()}</span>
            </div>
        }
    };

    view! {
        <ToastView toast=toast />
        <div class="grid gap-6 md:grid-cols-3">
            <div class="card bg-base-100 shadow-xl md:col-span-1">
                <div class="card-body">
                    <h3 class="card-title">"Thông tin người thuê"</h3>
                    {info_row("Họ tên", |u| u.name.clone())}
                    {info_row("Số điện thoại", |u| u.phone.clone())}
                    {info_row("CCCD", |u| u.national_id.clone())}
                    {info_row("Địa chỉ", |u| u.address.clone())}
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl md:col-span-2">
                <form class="card-body space-y-2" on:submit=on_submit>
                    <h3 class="card-title">"Thuê xe"</h3>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <Show
                        when=move || catalog.with(Option::is_some)
                        fallback=|| view! { <span class="loading loading-spinner loading-md"></span> }
                    >
                        <div class="form-control">
                            <label class="label" for="car">
                                <span class="label-text">"Xe"</span>
                            </label>
                            <select
                                id="car"
                                class="select select-bordered w-full"
                                disabled=move || is_submitting.get()
                                on:change=move |ev| {
                                    let raw = event_target_value(&ev);
                                    form.update(|f| f.select_car(&raw));
                                }
                            >
                                <option value="">"-- Chọn xe --"</option>
                                {move || catalog.with(|c| {
                                    c.iter()
                                        .flat_map(|c| c.cars.iter())
                                        .map(|car| {
                                            let label = format!(
                                                "{} {} ({}) - {} đ/ngày",
                                                car.brand,
                                                car.name,
                                                car.license_plate,
                                                format_vnd(car.price_per_day),
                                            );
                                            view! { <option value=car.id.to_string()>{label}</option> }
                                        })
                                        .collect_view()
                                })}
                            </select>
                        </div>

                        <div class="form-control">
                            <label class="label" for="collateral">
                                <span class="label-text">"Tài sản thế chấp"</span>
                            </label>
                            <select
                                id="collateral"
                                class="select select-bordered w-full"
                                disabled=move || is_submitting.get()
                                on:change=move |ev| {
                                    let raw = event_target_value(&ev);
                                    form.update(|f| f.select_collateral(&raw));
                                }
                            >
                                <option value="">"-- Chọn tài sản --"</option>
                                {move || catalog.with(|c| {
                                    c.iter()
                                        .flat_map(|c| c.collaterals.iter())
                                        .map(|item| {
                                            let label = format!("{} ({})", item.name, item.kind);
                                            view! { <option value=item.id.to_string()>{label}</option> }
                                        })
                                        .collect_view()
                                })}
                            </select>
                        </div>

                        <div class="grid gap-4 md:grid-cols-2">
                            <div class="form-control">
                                <label class="label" for="start-date">
                                    <span class="label-text">"Ngày bắt đầu"</span>
                                </label>
                                <input
                                    id="start-date"
                                    type="date"
                                    class="input input-bordered"
                                    disabled=move || is_submitting.get()
                                    prop:value=move || form.with(|f| f.start_date.map(|d| d.to_string()).unwrap_or_default())
                                    on:change=move |ev| set_date(event_target_value(&ev), RentalForm::set_start)
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="end-date">
                                    <span class="label-text">"Ngày kết thúc"</span>
                                </label>
                                <input
                                    id="end-date"
                                    type="date"
                                    class="input input-bordered"
                                    disabled=move || is_submitting.get()
                                    prop:value=move || form.with(|f| f.end_date.map(|d| d.to_string()).unwrap_or_default())
                                    on:change=move |ev| set_date(event_target_value(&ev), RentalForm::set_end)
                                />
                            </div>
                        </div>

                        <div class="stats bg-base-200 w-full">
                            <div class="stat">
                                <div class="stat-title">"Giá dự kiến"</div>
                                <div class="stat-value text-primary">
                                    {move || match estimate() {
                                        Some(price) => format!("{} đ", format_vnd(price)),
                                        None => "-".to_string(),
                                    }}
                                </div>
                            </div>
                        </div>

                        <div class="card-actions justify-end pt-2">
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || is_submitting.get() || !form.with(RentalForm::is_complete)
                            >
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Đang gửi..." }.into_any()
                                } else {
                                    "Xác nhận thuê".into_any()
                                }}
                            </button>
                        </div>
                    </Show>
                </form>
            </div>
        </div>
    }
}
