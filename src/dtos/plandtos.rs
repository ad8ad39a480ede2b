use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validate_not_blank;
use crate::models::planmodel::{BillingPeriod, NewServicePlan, PlanPatch};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanDto {
    #[validate(
        length(min = 1, max = 100, message = "Plan name must be between 1-100 characters"),
        custom = "validate_not_blank"
    )]
    pub plan_name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,

    pub billing_period: BillingPeriod,

    #[validate(length(max = 50, message = "A plan can list at most 50 items"))]
    pub items: Vec<String>,

    pub is_popular: Option<bool>,

    pub sort_order: Option<i32>,
}

impl CreatePlanDto {
    pub fn into_new_plan(self, service_id: Uuid) -> NewServicePlan {
        NewServicePlan {
            service_id,
            plan_name: self.plan_name.trim().to_string(),
            description: self.description,
            price: self.price,
            billing_period: self.billing_period,
            items: self.items,
            is_popular: self.is_popular.unwrap_or(false),
            sort_order: self.sort_order.unwrap_or(0),
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanDto {
    #[validate(
        length(min = 1, max = 100, message = "Plan name must be between 1-100 characters"),
        custom = "validate_not_blank"
    )]
    pub plan_name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: Option<i64>,

    pub billing_period: Option<BillingPeriod>,

    #[validate(length(max = 50, message = "A plan can list at most 50 items"))]
    pub items: Option<Vec<String>>,

    pub is_popular: Option<bool>,

    pub sort_order: Option<i32>,

    pub is_active: Option<bool>,
}

impl From<UpdatePlanDto> for PlanPatch {
    fn from(dto: UpdatePlanDto) -> Self {
        PlanPatch {
            plan_name: dto.plan_name.map(|name| name.trim().to_string()),
            description: dto.description,
            price: dto.price,
            billing_period: dto.billing_period,
            items: dto.items,
            is_popular: dto.is_popular,
            sort_order: dto.sort_order,
            is_active: dto.is_active,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeletePlanQueryDto {
    pub permanent: Option<bool>,
}
