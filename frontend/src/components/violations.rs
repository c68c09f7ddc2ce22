use carrent_client::draft::ViolationDraft;
use carrent_client::form::FormModal;
use carrent_shared::Violation;
use carrent_shared::pricing::format_vnd;
use leptos::prelude::*;

use crate::auth::{Api, AuthContext};
use crate::components::form_modal::violation_fields;
use crate::components::list_page::{CrudPage, ListController};

const HEADERS: &[(&str, &str)] = &[
    ("Tên vi phạm", ""),
    ("Mức phạt", ""),
    ("Mô tả", "hidden md:table-cell"),
];

/// 违章罚款项管理：唯一支持新建的管理列表
#[component]
pub fn ViolationsPage(auth: AuthContext) -> impl IntoView {
    let list = ListController::new(auth.page_limit(), Api::violations);
    let modal = RwSignal::new(FormModal::<ViolationDraft>::new());

    let cells = |violation: Violation| {
        view! {
            <td class="font-semibold">{violation.name}</td>
            <td>{format_vnd(violation.price)} " đ"</td>
            <td class="hidden md:table-cell">{violation.description}</td>
        }
        .into_any()
    };

    view! {
        <CrudPage
            auth=auth
            list=list
            modal=modal
            title="Vi phạm"
            headers=HEADERS
            cells=cells
            fields=violation_fields()
            create_title="Thêm vi phạm"
            edit_title="Sửa vi phạm"
            delete_message="Bạn có chắc muốn xóa vi phạm này?"
            deleted="Đã xóa vi phạm"
        >
            <button class="btn btn-primary" on:click=move |_| modal.update(|m| m.open_create())>
                "Thêm vi phạm"
            </button>
        </CrudPage>
    }
}
