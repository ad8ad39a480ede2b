use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::Store,
    dtos::plandtos::{CreatePlanDto, UpdatePlanDto},
    models::{
        planmodel::{PlanPatch, ServicePlan},
        usermodel::User,
    },
};

use super::{access::require_admin, error::ServiceError};

pub struct PlanService {
    db_client: Arc<dyn Store>,
}

impl PlanService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    async fn ensure_service_exists(&self, service_id: Uuid) -> Result<(), ServiceError> {
        match self.db_client.get_service(service_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::ServiceNotFound(service_id)),
        }
    }

    async fn find_plan(&self, plan_id: Uuid) -> Result<ServicePlan, ServiceError> {
        self.db_client
            .get_plan(plan_id)
            .await?
            .ok_or(ServiceError::PlanNotFound(plan_id))
    }

    /// Plans of a service by `sort_order`. Only admins may include inactive plans.
    pub async fn list_plans_for_service(
        &self,
        actor: Option<&User>,
        service_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<ServicePlan>, ServiceError> {
        if !active_only {
            let actor = actor.ok_or(ServiceError::NotAuthenticated)?;
            require_admin(actor)?;
        }

        self.ensure_service_exists(service_id).await?;
        Ok(self
            .db_client
            .get_service_plans(service_id, active_only)
            .await?)
    }

    pub async fn get_plan(&self, actor: Option<&User>, plan_id: Uuid) -> Result<ServicePlan, ServiceError> {
        let plan = self.find_plan(plan_id).await?;

        let is_admin = actor.map_or(false, User::is_admin);
        if !plan.is_active && !is_admin {
            return Err(ServiceError::PlanNotFound(plan_id));
        }

        Ok(plan)
    }

    pub async fn create_plan(
        &self,
        actor: &User,
        service_id: Uuid,
        body: CreatePlanDto,
    ) -> Result<ServicePlan, ServiceError> {
        require_admin(actor)?;
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        self.ensure_service_exists(service_id).await?;

        let plan = self
            .db_client
            .create_plan(body.into_new_plan(service_id))
            .await?;

        tracing::info!(
            "Plan {} ({}) created for service {}",
            plan.id,
            plan.plan_name,
            service_id
        );
        Ok(plan)
    }

    pub async fn update_plan(
        &self,
        actor: &User,
        plan_id: Uuid,
        body: UpdatePlanDto,
    ) -> Result<ServicePlan, ServiceError> {
        require_admin(actor)?;
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        self.apply_patch(plan_id, body.into()).await
    }

    /// Soft delete: the plan stays referenced by enrollments but is no longer offered.
    pub async fn deactivate_plan(&self, actor: &User, plan_id: Uuid) -> Result<ServicePlan, ServiceError> {
        require_admin(actor)?;

        let plan = self
            .apply_patch(
                plan_id,
                PlanPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!("Plan {} deactivated by {}", plan_id, actor.id);
        Ok(plan)
    }

    pub async fn delete_plan(&self, actor: &User, plan_id: Uuid) -> Result<(), ServiceError> {
        require_admin(actor)?;
        self.find_plan(plan_id).await?;

        self.db_client.delete_plan(plan_id).await?;
        tracing::info!("Plan {} permanently deleted by {}", plan_id, actor.id);
        Ok(())
    }

    async fn apply_patch(&self, plan_id: Uuid, patch: PlanPatch) -> Result<ServicePlan, ServiceError> {
        self.find_plan(plan_id).await?;

        self.db_client
            .update_plan(plan_id, patch)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ServiceError::PlanNotFound(plan_id),
                e => ServiceError::Database(e),
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        db::{memorydb::MemoryStore, servicedb::ServiceExt},
        models::{planmodel::BillingPeriod, usermodel::UserRole},
        service::catalog_service::tests::{design_service, seed_user},
    };

    pub(crate) fn plan(name: &str, price: i64, period: BillingPeriod, sort_order: i32) -> CreatePlanDto {
        CreatePlanDto {
            plan_name: name.to_string(),
            description: format!("{} tier", name),
            price,
            billing_period: period,
            items: vec!["Unlimited requests".to_string()],
            is_popular: None,
            sort_order: Some(sort_order),
        }
    }

    async fn setup() -> (Arc<MemoryStore>, User, User, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let admin = seed_user(&store, "admin", UserRole::Admin).await;
        let member = seed_user(&store, "member", UserRole::User).await;
        let service = store.create_service(design_service().into()).await.unwrap();
        (store, admin, member, service.id)
    }

    #[tokio::test]
    async fn test_create_plan_defaults() {
        let (store, admin, _, service_id) = setup().await;
        let plans = PlanService::new(store);

        let created = plans
            .create_plan(
                &admin,
                service_id,
                CreatePlanDto {
                    sort_order: None,
                    ..plan("Pro", 500_000, BillingPeriod::Monthly, 0)
                },
            )
            .await
            .unwrap();

        assert!(created.is_active);
        assert!(!created.is_popular);
        assert_eq!(created.sort_order, 0);
        assert_eq!(created.service_id, service_id);
    }

    #[tokio::test]
    async fn test_create_plan_validation() {
        let (store, admin, member, service_id) = setup().await;
        let plans = PlanService::new(store.clone());

        assert!(matches!(
            plans
                .create_plan(&admin, service_id, plan("Bad", -1, BillingPeriod::Monthly, 0))
                .await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            plans
                .create_plan(&admin, Uuid::new_v4(), plan("Pro", 1, BillingPeriod::Monthly, 0))
                .await,
            Err(ServiceError::ServiceNotFound(_))
        ));
        assert!(matches!(
            plans
                .create_plan(&member, service_id, plan("Pro", 1, BillingPeriod::Monthly, 0))
                .await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(plans
            .list_plans_for_service(None, service_id, true)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_listing_order_and_visibility() {
        let (store, admin, member, service_id) = setup().await;
        let plans = PlanService::new(store);

        let business = plans
            .create_plan(&admin, service_id, plan("Business", 900_000, BillingPeriod::Yearly, 2))
            .await
            .unwrap();
        let starter = plans
            .create_plan(&admin, service_id, plan("Starter", 100_000, BillingPeriod::Monthly, 0))
            .await
            .unwrap();
        let pro = plans
            .create_plan(&admin, service_id, plan("Pro", 500_000, BillingPeriod::Monthly, 1))
            .await
            .unwrap();

        plans.deactivate_plan(&admin, business.id).await.unwrap();

        let public = plans
            .list_plans_for_service(Some(&member), service_id, true)
            .await
            .unwrap();
        let ids: Vec<Uuid> = public.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![starter.id, pro.id]);

        let all = plans
            .list_plans_for_service(Some(&admin), service_id, false)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, business.id);
        assert!(!all[2].is_active);

        assert!(matches!(
            plans.list_plans_for_service(Some(&member), service_id, false).await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(
            plans.list_plans_for_service(None, Uuid::new_v4(), true).await,
            Err(ServiceError::ServiceNotFound(_))
        ));

        assert!(matches!(
            plans.get_plan(Some(&member), business.id).await,
            Err(ServiceError::PlanNotFound(_))
        ));
        assert!(plans.get_plan(Some(&admin), business.id).await.is_ok());
        assert!(plans.get_plan(None, pro.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_and_delete_plan() {
        let (store, admin, _, service_id) = setup().await;
        let plans = PlanService::new(store);

        let pro = plans
            .create_plan(&admin, service_id, plan("Pro", 500_000, BillingPeriod::Monthly, 1))
            .await
            .unwrap();

        let updated = plans
            .update_plan(
                &admin,
                pro.id,
                UpdatePlanDto {
                    price: Some(450_000),
                    is_popular: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 450_000);
        assert!(updated.is_popular);
        assert_eq!(updated.plan_name, "Pro");

        plans.delete_plan(&admin, pro.id).await.unwrap();
        assert!(matches!(
            plans.get_plan(Some(&admin), pro.id).await,
            Err(ServiceError::PlanNotFound(_))
        ));
        assert!(matches!(
            plans.delete_plan(&admin, pro.id).await,
            Err(ServiceError::PlanNotFound(_))
        ));
        assert!(matches!(
            plans.update_plan(&admin, pro.id, UpdatePlanDto::default()).await,
            Err(ServiceError::PlanNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_mutate_plans() {
        let (store, admin, member, service_id) = setup().await;
        let plans = PlanService::new(store);

        let pro = plans
            .create_plan(&admin, service_id, plan("Pro", 500_000, BillingPeriod::Monthly, 1))
            .await
            .unwrap();

        assert!(matches!(
            plans
                .update_plan(
                    &member,
                    pro.id,
                    UpdatePlanDto {
                        price: Some(0),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(
            plans.deactivate_plan(&member, pro.id).await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(
            plans.delete_plan(&member, pro.id).await,
            Err(ServiceError::AccessDenied)
        ));

        assert_eq!(plans.get_plan(Some(&admin), pro.id).await.unwrap(), pro);
    }

    #[tokio::test]
    async fn test_blank_plan_name_is_rejected() {
        let (store, admin, _, service_id) = setup().await;
        let plans = PlanService::new(store);

        assert!(matches!(
            plans
                .create_plan(&admin, service_id, plan("   ", 1, BillingPeriod::Monthly, 0))
                .await,
            Err(ServiceError::Validation(_))
        ));

        let pro = plans
            .create_plan(&admin, service_id, plan("Pro", 500_000, BillingPeriod::Monthly, 1))
            .await
            .unwrap();
        assert!(matches!(
            plans
                .update_plan(
                    &admin,
                    pro.id,
                    UpdatePlanDto {
                        plan_name: Some("  ".to_string()),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::Validation(_))
        ));

        let listed = plans
            .list_plans_for_service(None, service_id, true)
            .await
            .unwrap();
        assert_eq!(listed, vec![pro]);
    }
}
