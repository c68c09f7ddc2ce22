//! 各实体的表单草稿
//!
//! 草稿只保存用户正在编辑的字段；提交时与原实体比较，生成只含改动字段的 patch。

use std::convert::Infallible;

use carrent_shared::patch::{PersonField, ViolationField};
use carrent_shared::validation::require;
use carrent_shared::{
    Customer, CustomerPatch, EntityId, NewViolation, User, UserPatch, ValidationError, Violation,
    ViolationPatch,
};

use crate::form::{CreatableDraft, FormDraft};

// =========================================================
// 客户 / 用户
// =========================================================

macro_rules! person_draft {
    ($(#[$meta:meta])* $name:ident, $entity:ty, $patch:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub name: String,
            pub phone: String,
            pub national_id: String,
            pub address: String,
        }

        impl $name {
            fn slot(&mut self, field: PersonField) -> &mut String {
                match field {
                    PersonField::Name => &mut self.name,
                    PersonField::Phone => &mut self.phone,
                    PersonField::NationalId => &mut self.national_id,
                    PersonField::Address => &mut self.address,
                }
            }
        }

        impl FormDraft for $name {
            type Entity = $entity;
            type Field = PersonField;
            type Patch = $patch;
            type New = Infallible;

            fn from_entity(entity: &$entity) -> Self {
                Self {
                    name: entity.name.clone(),
                    phone: entity.phone.clone(),
                    national_id: entity.national_id.clone(),
                    address: entity.address.clone(),
                }
            }

            fn entity_id(entity: &$entity) -> EntityId {
                entity.id.clone()
            }

            fn value(&self, field: PersonField) -> String {
                match field {
                    PersonField::Name => self.name.clone(),
                    PersonField::Phone => self.phone.clone(),
                    PersonField::NationalId => self.national_id.clone(),
                    PersonField::Address => self.address.clone(),
                }
            }

            fn set(&mut self, field: PersonField, value: &str) -> Result<(), ValidationError> {
                *self.slot(field) = value.to_string();
                Ok(())
            }

            fn validate(&self) -> Result<(), ValidationError> {
                require("họ tên", &self.name)
            }

            fn to_patch(&self, original: &$entity) -> Option<$patch> {
                let before = Self::from_entity(original);
                let mut patch = <$patch>::default();
                for field in PersonField::ALL {
                    let after = self.value(field);
                    if after != before.value(field) {
                        patch.set(field, after.trim().to_string());
                    }
                }
                (!patch.is_empty()).then_some(patch)
            }

            fn to_new(&self) -> Result<Infallible, ValidationError> {
                Err(ValidationError::NotCreatable)
            }
        }
    };
}

person_draft!(
    /// 客户编辑表单
    CustomerDraft,
    Customer,
    CustomerPatch
);

person_draft!(
    /// 用户编辑表单；邮箱与角色不可编辑
    UserDraft,
    User,
    UserPatch
);

// =========================================================
// 违章
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationDraft {
    pub name: String,
    /// 输入时即转换为整数，空输入视为 0
    pub price: i64,
    pub description: String,
}

/// 价格输入转换为整数
pub fn parse_amount(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber { field })
}

impl FormDraft for ViolationDraft {
    type Entity = Violation;
    type Field = ViolationField;
    type Patch = ViolationPatch;
    type New = NewViolation;

    fn from_entity(entity: &Violation) -> Self {
        Self {
            name: entity.name.clone(),
            price: entity.price,
            description: entity.description.clone(),
        }
    }

    fn entity_id(entity: &Violation) -> EntityId {
        entity.id.clone()
    }

    fn value(&self, field: ViolationField) -> String {
        match field {
            ViolationField::Name => self.name.clone(),
            ViolationField::Price => self.price.to_string(),
            ViolationField::Description => self.description.clone(),
        }
    }

    fn set(&mut self, field: ViolationField, value: &str) -> Result<(), ValidationError> {
        match field {
            ViolationField::Name => self.name = value.to_string(),
            ViolationField::Price => self.price = parse_amount("giá", value)?,
            ViolationField::Description => self.description = value.to_string(),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("tên vi phạm", &self.name)?;
        if self.price < 0 {
            return Err(ValidationError::Negative { field: "giá" });
        }
        Ok(())
    }

    fn to_patch(&self, original: &Violation) -> Option<ViolationPatch> {
        let patch = ViolationPatch {
            name: (self.name != original.name).then(|| self.name.trim().to_string()),
            price: (self.price != original.price).then_some(self.price),
            description: (self.description != original.description)
                .then(|| self.description.clone()),
        };
        (!patch.is_empty()).then_some(patch)
    }

    fn to_new(&self) -> Result<NewViolation, ValidationError> {
        Ok(NewViolation {
            name: self.name.trim().to_string(),
            price: self.price,
            description: self.description.clone(),
        })
    }
}

impl CreatableDraft for ViolationDraft {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn customer() -> Customer {
        Customer {
            id: "1".into(),
            name: "Trần B".into(),
            phone: "0909".into(),
            national_id: "0123".into(),
            address: "Huế".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_patch_contains_only_changed_fields() {
        let original = customer();
        let mut draft = CustomerDraft::from_entity(&original);
        assert_eq!(draft.to_patch(&original), None);

        draft.set_field("address", "Đà Nẵng ").unwrap();
        let patch = draft.to_patch(&original).unwrap();
        assert_eq!(
            patch,
            CustomerPatch {
                address: Some("Đà Nẵng".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut draft = UserDraft::default();
        assert_eq!(
            draft.set_field("role", "admin"),
            Err(ValidationError::UnknownField("role".into()))
        );
        assert_eq!(draft, UserDraft::default());
    }

    #[test]
    fn test_person_name_required() {
        let draft = CustomerDraft {
            name: "  ".into(),
            ..Default::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::Required("họ tên")));
    }

    #[rstest]
    #[case("150000", Ok(150000))]
    #[case(" 42 ", Ok(42))]
    #[case("", Ok(0))]
    #[case("12a", Err(ValidationError::InvalidNumber { field: "giá" }))]
    fn test_price_coerced_on_input(#[case] raw: &str, #[case] expected: Result<i64, ValidationError>) {
        let mut draft = ViolationDraft {
            price: 7,
            ..Default::default()
        };
        let result = draft.set_field("price", raw).map(|_| draft.price);
        assert_eq!(result, expected);
        if expected.is_err() {
            assert_eq!(draft.price, 7);
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let draft = ViolationDraft {
            name: "Quá tốc độ".into(),
            price: -1,
            description: String::new(),
        };
        assert_eq!(draft.validate(), Err(ValidationError::Negative { field: "giá" }));
    }

    #[test]
    fn test_violation_patch_and_new() {
        let original = Violation {
            id: "5".into(),
            name: "Trễ hạn".into(),
            price: 100000,
            ..Default::default()
        };
        let mut draft = ViolationDraft::from_entity(&original);
        draft.set_field("price", "200000").unwrap();
        assert_eq!(
            draft.to_patch(&original),
            Some(ViolationPatch {
                price: Some(200000),
                ..Default::default()
            })
        );
        assert_eq!(draft.to_new().unwrap().price, 200000);
        assert_eq!(
            CustomerDraft::default().to_new().err(),
            Some(ValidationError::NotCreatable)
        );
    }
}
