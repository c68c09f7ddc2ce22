use carrent_client::form::{FormDraft, FormModal, ModalMode};
use carrent_shared::patch::{PersonField, ViolationField};
use leptos::prelude::*;

/// 表单上的一个输入框：字段, 标签, input 类型
pub type FieldSpec<F> = (F, &'static str, &'static str);

/// 客户 / 用户表单
pub fn person_fields() -> Vec<FieldSpec<PersonField>> {
    PersonField::ALL
        .into_iter()
        .map(|field| {
            let label = match field {
                PersonField::Name => "Họ tên",
                PersonField::Phone => "Số điện thoại",
                PersonField::NationalId => "CCCD",
                PersonField::Address => "Địa chỉ",
            };
            (field, label, "text")
        })
        .collect()
}

pub fn violation_fields() -> Vec<FieldSpec<ViolationField>> {
    vec![
        (ViolationField::Name, "Tên vi phạm", "text"),
        (ViolationField::Price, "Mức phạt (VNĐ)", "number"),
        (ViolationField::Description, "Mô tả", "text"),
    ]
}

/// 写入一个输入框的值；格式错误时给出提示，改正后提示消失
fn apply_input<D>(
    modal: RwSignal<FormModal<D>>,
    error: RwSignal<Option<String>>,
    name: &str,
    value: &str,
) where
    D: FormDraft + Send + Sync + 'static,
    D::Entity: Send + Sync + 'static,
{
    match modal.try_update(|m| m.set_field(name, value)) {
        Some(Ok(())) => error.set(None),
        Some(Err(e)) => error.set(Some(e.to_string())),
        None => {}
    }
}

/// 通用的实体编辑弹窗
///
/// 只负责输入；提交由 `on_submit` 交给列表控制器，校验错误写回 `error`。
#[component]
pub fn FormModalView<D>(
    modal: RwSignal<FormModal<D>>,
    error: RwSignal<Option<String>>,
    #[prop(into)] create_title: String,
    #[prop(into)] edit_title: String,
    fields: Vec<FieldSpec<D::Field>>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView
where
    D: FormDraft + Send + Sync + 'static,
    D::Entity: Send + Sync + 'static,
    D::Field: AsRef<str> + Send + Sync + 'static,
{
    let is_open = move || modal.with(|m| m.is_open());
    let submitting = move || modal.with(|m| m.is_submitting());

    // 打开 / 关闭时清除上一次的错误
    Effect::new(move |_| {
        is_open();
        error.set(None);
    });

    let title = move || {
        modal.with(|m| match m.mode() {
            ModalMode::Create => create_title.clone(),
            ModalMode::Edit(_) => edit_title.clone(),
        })
    };

    let submit_form = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };

    let inputs = fields
        .into_iter()
        .map(|(field, label, kind)| {
            let name = field.as_ref().to_string();
            let id = format!("field-{}", name);
            view! {
                <div class="form-control">
                    <label class="label" for=id.clone()>
                        <span class="label-text">{label}</span>
                    </label>
                    <input
                        id=id
                        type=kind
                        class="input input-bordered w-full"
                        prop:value=move || modal.with(|m| m.value(field))
                        disabled=submitting
                        on:input=move |ev| apply_input(modal, error, &name, &event_target_value(&ev))
                    />
                </div>
            }
        })
        .collect_view();

    view! {
        <div class=move || if is_open() { "modal modal-open" } else { "modal" }>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{title}</h3>
                <form on:submit=submit_form class="space-y-4 pt-4">
                    <Show when=move || error.with(Option::is_some)>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    {inputs}
                    <div class="modal-action">
                        <button
                            type="button"
                            class="btn"
                            disabled=submitting
                            on:click=move |_| modal.update(|m| m.close())
                        >
                            "Hủy"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=submitting>
                            {move || if submitting() {
                                view! { <span class="loading loading-spinner"></span> "Đang lưu..." }.into_any()
                            } else {
                                "Lưu".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carrent_client::draft::ViolationDraft;
    use leptos::prelude::Owner;

    #[test]
    fn test_corrected_price_clears_error() {
        let owner = Owner::new();
        owner.with(|| {
            let modal = RwSignal::new(FormModal::<ViolationDraft>::new());
            modal.update(|m| m.open_create());
            let error = RwSignal::new(None);

            apply_input(modal, error, "price", "12a");
            assert!(error.get_untracked().is_some());

            apply_input(modal, error, "price", "120000");
            assert_eq!(error.get_untracked(), None);
            assert_eq!(modal.with_untracked(|m| m.draft().price), 120000);
        });
    }
}
