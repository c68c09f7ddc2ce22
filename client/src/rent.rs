use carrent_shared::pricing::estimate_for_car;
use carrent_shared::protocol::ListCars;
use carrent_shared::{
    Car, Collateral, Contract, EntityId, NewContract, RentalDate, User, ValidationError,
};

use crate::api::RentalApi;
use crate::error::ClientResult;
use crate::request::HttpClient;

/// 租车页的选择项：车辆与抵押物，只加载一次
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalCatalog {
    pub cars: Vec<Car>,
    pub collaterals: Vec<Collateral>,
}

impl RentalCatalog {
    pub async fn load<C: HttpClient>(api: &RentalApi<C>) -> ClientResult<Self> {
        let all_cars = ListCars::default();
        let car_api = api.cars();
        let collateral_api = api.collaterals();
        let (cars, collaterals) = futures::join!(car_api.all(&all_cars), collateral_api.all());
        Ok(Self {
            cars: cars?,
            collaterals: collaterals?,
        })
    }

    pub fn car(&self, id: &EntityId) -> Option<&Car> {
        self.cars.iter().find(|c| &c.id == id)
    }
}

/// 新建合同表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalForm {
    pub car_id: Option<EntityId>,
    pub collateral_id: Option<EntityId>,
    pub start_date: Option<RentalDate>,
    pub end_date: Option<RentalDate>,
}

fn non_empty_id(raw: &str) -> Option<EntityId> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| EntityId::from(raw))
}

fn optional_date(raw: &str) -> Result<Option<RentalDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some)
}

impl RentalForm {
    pub fn select_car(&mut self, raw: &str) {
        self.car_id = non_empty_id(raw);
    }

    pub fn select_collateral(&mut self, raw: &str) {
        self.collateral_id = non_empty_id(raw);
    }

    pub fn set_start(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.start_date = optional_date(raw)?;
        Ok(())
    }

    pub fn set_end(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.end_date = optional_date(raw)?;
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.car_id.is_some()
            && self.collateral_id.is_some()
            && self.start_date.is_some()
            && self.end_date.is_some()
    }

    /// 实时估价；信息不全或日期颠倒时没有估价
    pub fn estimate(&self, catalog: &RentalCatalog) -> Option<i64> {
        let car = catalog.car(self.car_id.as_ref()?)?;
        estimate_for_car(car, self.start_date?, self.end_date?).ok()
    }

    /// 为当前用户构造合同
    pub fn to_contract(
        &self,
        user: &User,
        catalog: &RentalCatalog,
    ) -> Result<NewContract, ValidationError> {
        let car = self
            .car_id
            .as_ref()
            .and_then(|id| catalog.car(id))
            .ok_or(ValidationError::Required("xe"))?;
        let collateral_id = self
            .collateral_id
            .clone()
            .ok_or(ValidationError::Required("tài sản thế chấp"))?;
        let start_date = self
            .start_date
            .ok_or(ValidationError::Required("ngày bắt đầu"))?;
        let end_date = self
            .end_date
            .ok_or(ValidationError::Required("ngày kết thúc"))?;

        Ok(NewContract {
            user_id: user.id.clone(),
            car_id: car.id.clone(),
            collateral_id,
            start_date,
            end_date,
            estimated_price: estimate_for_car(car, start_date, end_date)?,
        })
    }
}

/// 提交合同；校验失败时不发出请求
pub async fn submit_rental<C: HttpClient>(
    api: &RentalApi<C>,
    user: &User,
    form: &RentalForm,
    catalog: &RentalCatalog,
) -> ClientResult<Contract> {
    let contract = form.to_contract(user, catalog)?;
    let created = api.contracts().create(contract).await?;
    tracing::info!(contract = %created.id, price = created.estimated_price, "contract created");
    Ok(created)
}
