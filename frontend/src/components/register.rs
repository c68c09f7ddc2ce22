use carrent_client::route::AppRoute;
use carrent_shared::validation::RegistrationForm;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::AuthContext;
use crate::web::router::{Link, RouterService};

/// 输入框 id, 标签, input 类型
const FIELDS: [(&str, &str, &str); 7] = [
    ("name", "Họ tên", "text"),
    ("email", "Email", "email"),
    ("phone", "Số điện thoại", "tel"),
    ("cccd", "CCCD", "text"),
    ("address", "Địa chỉ", "text"),
    ("password", "Mật khẩu", "password"),
    ("confirm-password", "Xác nhận mật khẩu", "password"),
];

fn field_mut<'a>(form: &'a mut RegistrationForm, id: &str) -> Option<&'a mut String> {
    Some(match id {
        "name" => &mut form.name,
        "email" => &mut form.email,
        "phone" => &mut form.phone,
        "cccd" => &mut form.national_id,
        "address" => &mut form.address,
        "password" => &mut form.password,
        "confirm-password" => &mut form.confirm_password,
        _ => return None,
    })
}

fn field_value<'a>(form: &'a RegistrationForm, id: &str) -> &'a str {
    match id {
        "name" => &form.name,
        "email" => &form.email,
        "phone" => &form.phone,
        "cccd" => &form.national_id,
        "address" => &form.address,
        "password" => &form.password,
        "confirm-password" => &form.confirm_password,
        _ => "",
    }
}

#[component]
pub fn RegisterPage(auth: AuthContext, router: RouterService) -> impl IntoView {
    let form = RwSignal::new(RegistrationForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let current = form.get_untracked();
        spawn_local(async move {
            match auth.register(&current).await {
                Ok(()) => router.navigate(AppRoute::Home),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    let inputs = FIELDS
        .into_iter()
        .map(|(id, label, kind)| {
            view! {
                <div class="form-control">
                    <label class="label" for=id>
                        <span class="label-text">{label}</span>
                    </label>
                    <input
                        id=id
                        type=kind
                        class="input input-bordered"
                        disabled=move || is_submitting.get()
                        prop:value=move || form.with(|f| field_value(f, id).to_string())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| {
                                if let Some(slot) = field_mut(f, id) {
                                    *slot = value;
                                }
                            });
                        }
                    />
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Đăng ký tài khoản"</h1>
                    <p class="text-base-content/70">"Điền thông tin để bắt đầu thuê xe"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        {inputs}

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Đang đăng ký..." }.into_any()
                                } else {
                                    "Đăng ký".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Đã có tài khoản? "
                            <Link to=AppRoute::Login class="link link-primary">
                                "Đăng nhập"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_input_maps_to_a_form_field() {
        let mut form = RegistrationForm::default();
        for (id, _, _) in FIELDS {
            let slot = field_mut(&mut form, id).unwrap();
            *slot = id.to_string();
        }
        assert_eq!(form.national_id, "cccd");
        assert_eq!(form.confirm_password, "confirm-password");
        assert_eq!(field_value(&form, "phone"), "phone");
        assert!(field_mut(&mut form, "unknown").is_none());
    }
}
