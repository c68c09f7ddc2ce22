//! 表单弹窗
//!
//! 状态机：`Closed -> Open -> Submitting -> Closed`。
//! 提交无论成败都会离开 `Submitting`：成功则关闭，失败回到 `Open` 并保留草稿。
//! 弹窗本身不知道网络细节，保存动作由调用方注入。

use std::str::FromStr;

use async_trait::async_trait;
use carrent_shared::{EntityId, ValidationError};

use crate::cell::StateCell;
use crate::error::ClientResult;

/// 可在弹窗中编辑的草稿
pub trait FormDraft: Clone + Default {
    type Entity: Clone;
    /// 封闭的可编辑字段集合
    type Field: FromStr<Err = ValidationError> + Copy;
    type Patch;
    type New;

    fn from_entity(entity: &Self::Entity) -> Self;
    fn entity_id(entity: &Self::Entity) -> EntityId;

    /// 当前输入框中显示的值
    fn value(&self, field: Self::Field) -> String;
    fn set(&mut self, field: Self::Field, value: &str) -> Result<(), ValidationError>;
    fn validate(&self) -> Result<(), ValidationError>;

    /// 与原实体比较得到的改动；没有改动时为 `None`
    fn to_patch(&self, original: &Self::Entity) -> Option<Self::Patch>;
    fn to_new(&self) -> Result<Self::New, ValidationError>;

    /// 按字段名写入，未知字段名被拒绝
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        let field = name.parse::<Self::Field>()?;
        self.set(field, value)
    }
}

/// 支持新建的草稿
pub trait CreatableDraft: FormDraft {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// 交给保存回调的请求
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest<N, P> {
    Create(N),
    Update { id: EntityId, patch: P },
}

pub type SaveOf<D> = SaveRequest<<D as FormDraft>::New, <D as FormDraft>::Patch>;

#[derive(Debug, Clone)]
pub struct FormModal<D: FormDraft> {
    state: ModalState,
    mode: ModalMode,
    draft: D,
    original: Option<D::Entity>,
}

impl<D: FormDraft> Default for FormModal<D> {
    fn default() -> Self {
        Self {
            state: ModalState::Closed,
            mode: ModalMode::Create,
            draft: D::default(),
            original: None,
        }
    }
}

impl<D: FormDraft> FormModal<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn mode(&self) -> &ModalMode {
        &self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == ModalState::Submitting
    }

    pub fn value(&self, field: D::Field) -> String {
        self.draft.value(field)
    }

    /// 以空草稿打开
    pub fn open_create(&mut self)
    where
        D: CreatableDraft,
    {
        self.mode = ModalMode::Create;
        self.draft = D::default();
        self.original = None;
        self.state = ModalState::Open;
    }

    /// 绑定到一个实体并打开；切换实体时草稿被完全替换
    pub fn open_edit(&mut self, entity: &D::Entity) {
        self.mode = ModalMode::Edit(D::entity_id(entity));
        self.draft = D::from_entity(entity);
        self.original = Some(entity.clone());
        self.state = ModalState::Open;
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
        self.mode = ModalMode::Create;
        self.draft = D::default();
        self.original = None;
    }

    /// 修改一个字段；提交过程中输入被忽略
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        if self.state != ModalState::Open {
            return Ok(());
        }
        self.draft.set_field(name, value)
    }

    /// 校验并进入 `Submitting`
    ///
    /// 返回 `Ok(None)` 表示无需保存：弹窗未打开，或编辑时没有任何改动（此时直接关闭）。
    pub fn begin_submit(&mut self) -> Result<Option<SaveOf<D>>, ValidationError> {
        if self.state != ModalState::Open {
            return Ok(None);
        }
        self.draft.validate()?;

        let request = match self.mode.clone() {
            ModalMode::Create => SaveRequest::Create(self.draft.to_new()?),
            ModalMode::Edit(id) => {
                let patch = self
                    .original
                    .as_ref()
                    .and_then(|original| self.draft.to_patch(original));
                match patch {
                    Some(patch) => SaveRequest::Update { id, patch },
                    None => {
                        tracing::debug!(%id, "no changes, closing form");
                        self.close();
                        return Ok(None);
                    }
                }
            }
        };

        self.state = ModalState::Submitting;
        Ok(Some(request))
    }

    /// 结束提交：成功关闭，失败回到 `Open`，错误原样交还调用方
    pub fn finish_submit(&mut self, result: ClientResult<()>) -> ClientResult<()> {
        if self.state != ModalState::Submitting {
            return result;
        }
        match result {
            Ok(()) => {
                self.close();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.state = ModalState::Open;
                Err(e)
            }
        }
    }
}

// =========================================================
// 保存
// =========================================================

/// 保存目标：把弹窗产生的请求发给对应资源
#[async_trait(?Send)]
pub trait SaveSink<D: FormDraft> {
    async fn save(&self, request: SaveOf<D>) -> ClientResult<()>;
}

/// 完整的提交流程：校验、保存、结束提交
///
/// 返回是否执行了保存。校验失败以 `ClientError::Validation` 返回，弹窗保持打开；
/// 保存失败时弹窗回到 `Open`，错误原样返回。
pub async fn submit<D, H, S>(modal: &H, sink: &S) -> ClientResult<bool>
where
    D: FormDraft,
    H: StateCell<FormModal<D>> + ?Sized,
    S: SaveSink<D> + ?Sized,
{
    let Some(request) = modal
        .update_state(FormModal::begin_submit)
        .transpose()?
        .flatten()
    else {
        return Ok(false);
    };
    let result = sink.save(request).await;
    // 弹窗已被销毁时结果无处可交
    modal
        .update_state(|m| m.finish_submit(result))
        .map_or(Ok(false), |outcome| outcome.map(|()| true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RentalApi;
    use crate::draft::{CustomerDraft, ViolationDraft};
    use crate::error::ClientError;
    use crate::request::{HttpMethod, MockHttpClient};
    use carrent_shared::protocol::{Operation, Resource};
    use carrent_shared::{Customer, CustomerPatch, Violation};
    use serde_json::json;
    use std::cell::RefCell;

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.into(),
            name: name.into(),
            phone: format!("phone-{}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_switching_entity_reinitializes_draft() {
        let mut modal = FormModal::<CustomerDraft>::new();
        let a = customer("1", "A");
        let b = customer("2", "B");

        modal.open_edit(&a);
        modal.set_field("name", "edited").unwrap();
        modal.open_edit(&b);
        assert_eq!(modal.draft(), &CustomerDraft::from_entity(&b));
        assert_eq!(modal.mode(), &ModalMode::Edit("2".into()));

        modal.close();
        assert!(!modal.is_open());
        assert_eq!(modal.draft(), &CustomerDraft::default());
    }

    #[test]
    fn test_edit_then_create_starts_empty() {
        let mut modal = FormModal::<ViolationDraft>::new();
        let v = Violation {
            id: "5".into(),
            name: "Trễ hạn".into(),
            price: 100,
            ..Default::default()
        };
        modal.open_edit(&v);
        modal.open_create();
        assert_eq!(modal.draft(), &ViolationDraft::default());
        assert_eq!(modal.mode(), &ModalMode::Create);
    }

    #[test]
    fn test_validation_failure_stays_open() {
        let mut modal = FormModal::<ViolationDraft>::new();
        modal.open_create();
        assert_eq!(
            modal.begin_submit(),
            Err(ValidationError::Required("tên vi phạm"))
        );
        assert_eq!(modal.state(), ModalState::Open);
    }

    #[test]
    fn test_unchanged_edit_closes_without_request() {
        let mut modal = FormModal::<CustomerDraft>::new();
        modal.open_edit(&customer("1", "A"));
        assert_eq!(modal.begin_submit(), Ok(None));
        assert_eq!(modal.state(), ModalState::Closed);
    }

    fn editing(entity: &Customer, name: &str) -> RefCell<FormModal<CustomerDraft>> {
        let mut modal = FormModal::<CustomerDraft>::new();
        modal.open_edit(entity);
        modal.set_field("name", name).unwrap();
        RefCell::new(modal)
    }

    #[tokio::test]
    async fn test_failed_save_returns_to_open() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        api.client().mock_response(
            HttpMethod::Patch,
            "http://api.test/customers/1",
            500,
            json!({ "message": "boom" }),
        );
        let modal = editing(&customer("1", "A"), "A2");

        let result = submit(&modal, &api.customers()).await;

        assert_eq!(
            result,
            Err(ClientError::RequestFailed {
                resource: Resource::Customers,
                operation: Operation::Update,
                status: 500,
            })
        );
        let modal = modal.into_inner();
        assert_eq!(modal.state(), ModalState::Open);
        assert_eq!(modal.draft().name, "A2");
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        let modal = editing(&customer("1", "A"), "  ");

        assert_eq!(
            submit(&modal, &api.customers()).await,
            Err(ClientError::Validation(ValidationError::Required("họ tên")))
        );
        assert!(api.client().requests().is_empty());
        assert_eq!(modal.borrow().state(), ModalState::Open);
    }

    #[tokio::test]
    async fn test_create_posts_new_violation() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        api.client().mock_response(
            HttpMethod::Post,
            "http://api.test/violations",
            201,
            json!({ "id": 9, "name": "Quá tốc độ", "price": 500000 }),
        );
        let mut modal = FormModal::<ViolationDraft>::new();
        modal.open_create();
        modal.set_field("name", "Quá tốc độ").unwrap();
        modal.set_field("price", "500000").unwrap();
        let modal = RefCell::new(modal);

        assert_eq!(submit(&modal, &api.violations()).await, Ok(true));
        assert_eq!(modal.borrow().state(), ModalState::Closed);
        assert_eq!(
            api.client().request_lines(),
            vec!["POST http://api.test/violations"]
        );
        assert_eq!(api.client().requests()[0].body_json()["price"], 500000);
    }

    #[tokio::test]
    async fn test_successful_save_sends_patch_and_closes() {
        let api = RentalApi::new(MockHttpClient::new(), "http://api.test");
        api.client().mock_response(
            HttpMethod::Patch,
            "http://api.test/customers/1",
            200,
            json!({ "id": 1, "name": "A2" }),
        );

        let modal = editing(&customer("1", "A"), "A2");

        assert_eq!(submit(&modal, &api.customers()).await, Ok(true));
        assert_eq!(modal.borrow().state(), ModalState::Closed);
        let sent = &api.client().requests()[0];
        assert_eq!(sent.body_json(), json!({ "name": "A2" }));
        assert_eq!(
            serde_json::from_value::<CustomerPatch>(sent.body_json()).unwrap().name,
            Some("A2".to_string())
        );
    }

    #[test]
    fn test_input_ignored_while_submitting() {
        let mut modal = FormModal::<ViolationDraft>::new();
        modal.open_create();
        modal.set_field("name", "Quá tốc độ").unwrap();
        let request = modal.begin_submit().unwrap();
        assert!(matches!(request, Some(SaveRequest::Create(_))));
        assert!(modal.is_submitting());

        modal.set_field("name", "other").unwrap();
        assert_eq!(modal.draft().name, "Quá tốc độ");

        assert_eq!(modal.finish_submit(Ok(())), Ok(()));
        assert_eq!(modal.state(), ModalState::Closed);
    }
}
