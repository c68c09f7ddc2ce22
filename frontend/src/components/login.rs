use carrent_client::route::AppRoute;
use carrent_shared::validation::LoginForm;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::AuthContext;
use crate::web::router::{Link, RouterService};

#[component]
pub fn LoginPage(auth: AuthContext, router: RouterService) -> impl IntoView {
    let form = RwSignal::new(LoginForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let current = form.get_untracked();
        spawn_local(async move {
            match auth.login(&current).await {
                // 守卫会把 Home 分派到对应角色的首页
                Ok(()) => router.navigate(AppRoute::Home),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Quản lý thuê xe"</h1>
                    <p class="text-base-content/70">"Đăng nhập để tiếp tục"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="ban@example.com"
                                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.email.clone())
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Mật khẩu"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.password.clone())
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Đang đăng nhập..." }.into_any()
                                } else {
                                    "Đăng nhập".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Chưa có tài khoản? "
                            <Link to=AppRoute::Register class="link link-primary">
                                "Đăng ký"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
