use carrent_client::draft::CustomerDraft;
use carrent_client::form::FormModal;
use carrent_shared::Customer;
use leptos::prelude::*;

use crate::auth::{Api, AuthContext};
use crate::components::form_modal::person_fields;
use crate::components::list_page::{CrudPage, ListController};

const HEADERS: &[(&str, &str)] = &[
    ("Họ tên", ""),
    ("Số điện thoại", ""),
    ("CCCD", ""),
    ("Địa chỉ", "hidden md:table-cell"),
];

#[component]
pub fn CustomersPage(auth: AuthContext) -> impl IntoView {
    let list = ListController::new(auth.page_limit(), Api::customers);
    let modal = RwSignal::new(FormModal::<CustomerDraft>::new());

    let cells = |customer: Customer| {
        view! {
            <td class="font-semibold">{customer.name}</td>
            <td>{customer.phone}</td>
            <td class="font-mono text-sm">{customer.national_id}</td>
            <td class="hidden md:table-cell">{customer.address}</td>
        }
        .into_any()
    };

    view! {
        <CrudPage
            auth=auth
            list=list
            modal=modal
            title="Khách hàng"
            headers=HEADERS
            cells=cells
            fields=person_fields()
            create_title="Thêm khách hàng"
            edit_title="Sửa khách hàng"
            delete_message="Bạn có chắc muốn xóa khách hàng này?"
            deleted="Đã xóa khách hàng"
        />
    }
}
