use carrent_client::draft::UserDraft;
use carrent_client::form::FormModal;
use carrent_shared::{Role, User};
use leptos::prelude::*;

use crate::auth::{Api, AuthContext};
use crate::components::form_modal::person_fields;
use crate::components::list_page::{CrudPage, ListController};

const HEADERS: &[(&str, &str)] = &[
    ("Họ tên", ""),
    ("Email", ""),
    ("Vai trò", ""),
    ("Số điện thoại", ""),
    ("CCCD", ""),
    ("Địa chỉ", "hidden md:table-cell"),
];

#[component]
pub fn UsersPage(auth: AuthContext) -> impl IntoView {
    let list = ListController::new(auth.page_limit(), Api::users);
    let modal = RwSignal::new(FormModal::<UserDraft>::new());

    let cells = |user: User| {
        let badge = match user.role {
            Role::Admin => "badge badge-primary",
            Role::User => "badge badge-ghost",
        };
        view! {
            <td class="font-semibold">{user.name}</td>
            <td>{user.email}</td>
            <td><span class=badge>{user.role.as_str()}</span></td>
            <td>{user.phone}</td>
            <td class="font-mono text-sm">{user.national_id}</td>
            <td class="hidden md:table-cell">{user.address}</td>
        }
        .into_any()
    };

    view! {
        <CrudPage
            auth=auth
            list=list
            modal=modal
            title="Người dùng"
            headers=HEADERS
            cells=cells
            fields=person_fields()
            create_title="Thêm người dùng"
            edit_title="Sửa người dùng"
            delete_message="Bạn có chắc muốn xóa người dùng này?"
            deleted="Đã xóa người dùng"
        />
    }
}
