use leptos::prelude::*;

/// 删除确认框；只有选择确认才会调用删除
#[component]
pub fn ConfirmDialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] message: String,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class=move || if open.get() { "modal modal-open" } else { "modal" }>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Xác nhận"</h3>
                <p class="py-4">{message}</p>
                <div class="modal-action">
                    <button class="btn" on:click=move |_| on_cancel.run(())>"Hủy"</button>
                    <button class="btn btn-error" on:click=move |_| on_confirm.run(())>"Xóa"</button>
                </div>
            </div>
        </div>
    }
}
