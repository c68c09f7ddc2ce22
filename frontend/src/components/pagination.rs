use leptos::prelude::*;

/// 上一页 / 下一页控件
///
/// 加载中或到达边界时按钮禁用，状态由列表自身计算。
#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] can_previous: Signal<bool>,
    #[prop(into)] can_next: Signal<bool>,
    #[prop(into)] on_previous: Callback<()>,
    #[prop(into)] on_next: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-end gap-2 p-4">
            <button
                class="btn btn-sm"
                disabled=move || !can_previous.get()
                on:click=move |_| on_previous.run(())
            >
                "Trước"
            </button>
            <span class="text-sm">
                "Trang " {move || page.get()} " / " {move || total_pages.get()}
            </span>
            <button
                class="btn btn-sm"
                disabled=move || !can_next.get()
                on:click=move |_| on_next.run(())
            >
                "Sau"
            </button>
        </div>
    }
}
