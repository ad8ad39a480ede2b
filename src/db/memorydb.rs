//! In-process store used when no `DATABASE_URL` is configured and by the test suite.
//!
//! Mirrors the Postgres queries closely enough that services behave the same
//! against either backend. Nothing is persisted across restarts.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    enrollmentdb::EnrollmentExt, plandb::PlanExt, servicedb::ServiceExt, userdb::UserExt,
};
use crate::models::{
    enrollmentmodel::{Enrollment, EnrollmentFilter, EnrollmentPatch, EnrollmentStatus, NewEnrollment},
    planmodel::{NewServicePlan, PlanPatch, ServicePlan},
    servicemodel::{NewService, Service, ServicePatch},
    usermodel::{UpsertUser, User, UserRole},
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    services: RwLock<Vec<Service>>,
    plans: RwLock<Vec<ServicePlan>>,
    enrollments: RwLock<Vec<Enrollment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserExt for MemoryStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_users(
        &self,
        role: Option<UserRole>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error> {
        let needle = search.map(|s| s.to_lowercase());
        let users = self.users.read().await;

        let mut found: Vec<User> = users
            .iter()
            .filter(|u| role.map_or(true, |role| u.role == role))
            .filter(|u| match &needle {
                None => true,
                Some(needle) => {
                    u.email.to_lowercase().contains(needle)
                        || u.name
                            .as_deref()
                            .map_or(false, |name| name.to_lowercase().contains(needle))
                }
            })
            .cloned()
            .collect();

        found.sort_by_key(|u| Reverse(u.created_at));
        Ok(found)
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let mut users = self.users.write().await;

        if let Some(existing) = users.iter_mut().find(|u| u.identity_id == user.identity_id) {
            existing.email = user.email;
            if user.name.is_some() {
                existing.name = user.name;
            }
            if user.phone.is_some() {
                existing.phone = user.phone;
            }
            if let Some(role) = user.role {
                existing.role = role;
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = User {
            id: Uuid::new_v4(),
            identity_id: user.identity_id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role.unwrap_or(UserRole::User),
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        if name.is_some() {
            user.name = name;
        }
        if phone.is_some() {
            user.phone = phone;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_user_role(&self, user_id: Uuid, role: UserRole) -> Result<User, sqlx::Error> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl ServiceExt for MemoryStore {
    async fn get_services(&self) -> Result<Vec<Service>, sqlx::Error> {
        let mut services = self.services.read().await.clone();
        services.sort_by_key(|s| s.created_at);
        Ok(services)
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        let services = self.services.read().await;
        Ok(services.iter().find(|s| s.id == service_id).cloned())
    }

    async fn create_service(&self, service: NewService) -> Result<Service, sqlx::Error> {
        let now = Utc::now();
        let created = Service {
            id: Uuid::new_v4(),
            name: service.name,
            description: service.description,
            emoji: service.emoji,
            is_new: service.is_new,
            created_at: now,
            updated_at: now,
        };
        self.services.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_service(
        &self,
        service_id: Uuid,
        patch: ServicePatch,
    ) -> Result<Service, sqlx::Error> {
        let mut services = self.services.write().await;
        let service = services
            .iter_mut()
            .find(|s| s.id == service_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        if let Some(name) = patch.name {
            service.name = name;
        }
        if let Some(description) = patch.description {
            service.description = description;
        }
        if let Some(emoji) = patch.emoji {
            service.emoji = emoji;
        }
        if patch.is_new.is_some() {
            service.is_new = patch.is_new;
        }
        service.updated_at = Utc::now();
        Ok(service.clone())
    }

    async fn delete_service(&self, service_id: Uuid) -> Result<(), sqlx::Error> {
        let mut services = self.services.write().await;
        let mut plans = self.plans.write().await;

        services.retain(|s| s.id != service_id);
        plans.retain(|p| p.service_id != service_id);
        Ok(())
    }
}

#[async_trait]
impl PlanExt for MemoryStore {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<ServicePlan>, sqlx::Error> {
        let plans = self.plans.read().await;
        Ok(plans.iter().find(|p| p.id == plan_id).cloned())
    }

    async fn get_service_plans(
        &self,
        service_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<ServicePlan>, sqlx::Error> {
        let plans = self.plans.read().await;
        let mut found: Vec<ServicePlan> = plans
            .iter()
            .filter(|p| p.service_id == service_id)
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();

        found.sort_by_key(|p| (p.sort_order, p.created_at));
        Ok(found)
    }

    async fn create_plan(&self, plan: NewServicePlan) -> Result<ServicePlan, sqlx::Error> {
        let now = Utc::now();
        let created = ServicePlan {
            id: Uuid::new_v4(),
            service_id: plan.service_id,
            plan_name: plan.plan_name,
            description: plan.description,
            price: plan.price,
            billing_period: plan.billing_period,
            items: plan.items,
            is_popular: plan.is_popular,
            sort_order: plan.sort_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.plans.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_plan(&self, plan_id: Uuid, patch: PlanPatch) -> Result<ServicePlan, sqlx::Error> {
        let mut plans = self.plans.write().await;
        let plan = plans
            .iter_mut()
            .find(|p| p.id == plan_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        if let Some(plan_name) = patch.plan_name {
            plan.plan_name = plan_name;
        }
        if let Some(description) = patch.description {
            plan.description = description;
        }
        if let Some(price) = patch.price {
            plan.price = price;
        }
        if let Some(billing_period) = patch.billing_period {
            plan.billing_period = billing_period;
        }
        if let Some(items) = patch.items {
            plan.items = items;
        }
        if let Some(is_popular) = patch.is_popular {
            plan.is_popular = is_popular;
        }
        if let Some(sort_order) = patch.sort_order {
            plan.sort_order = sort_order;
        }
        if let Some(is_active) = patch.is_active {
            plan.is_active = is_active;
        }
        plan.updated_at = Utc::now();
        Ok(plan.clone())
    }

    async fn delete_plan(&self, plan_id: Uuid) -> Result<(), sqlx::Error> {
        self.plans.write().await.retain(|p| p.id != plan_id);
        Ok(())
    }
}

#[async_trait]
impl EnrollmentExt for MemoryStore {
    async fn get_enrollment(&self, enrollment_id: Uuid) -> Result<Option<Enrollment>, sqlx::Error> {
        let enrollments = self.enrollments.read().await;
        Ok(enrollments.iter().find(|e| e.id == enrollment_id).cloned())
    }

    async fn get_user_enrollments(&self, user_id: Uuid) -> Result<Vec<Enrollment>, sqlx::Error> {
        let enrollments = self.enrollments.read().await;
        let mut found: Vec<Enrollment> = enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();

        found.sort_by_key(|e| Reverse(e.created_at));
        Ok(found)
    }

    async fn get_active_enrollment(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let enrollments = self.enrollments.read().await;
        Ok(enrollments
            .iter()
            .find(|e| {
                e.user_id == user_id
                    && e.service_id == service_id
                    && e.status == EnrollmentStatus::Active
            })
            .cloned())
    }

    async fn get_enrollments(&self, filter: EnrollmentFilter) -> Result<Vec<Enrollment>, sqlx::Error> {
        let enrollments = self.enrollments.read().await;
        let mut found: Vec<Enrollment> = enrollments
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        found.sort_by_key(|e| Reverse(e.created_at));
        Ok(found)
    }

    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment, sqlx::Error> {
        let now = Utc::now();
        let created = Enrollment {
            id: Uuid::new_v4(),
            user_id: enrollment.user_id,
            service_id: enrollment.service_id,
            plan_id: enrollment.plan_id,
            status: enrollment.status,
            payment_status: enrollment.payment_status,
            payment_method: enrollment.payment_method,
            transaction_id: enrollment.transaction_id,
            payment_gateway_data: enrollment.payment_gateway_data.map(Json),
            amount: enrollment.amount,
            currency: enrollment.currency,
            billing_period: enrollment.billing_period,
            start_date: enrollment.start_date,
            end_date: enrollment.end_date,
            next_billing_date: enrollment.next_billing_date,
            auto_renew: enrollment.auto_renew,
            cancelled_at: None,
            cancel_reason: None,
            notes: enrollment.notes,
            created_at: now,
            updated_at: now,
        };
        self.enrollments.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_enrollment(
        &self,
        enrollment_id: Uuid,
        patch: EnrollmentPatch,
    ) -> Result<Enrollment, sqlx::Error> {
        let mut enrollments = self.enrollments.write().await;
        let enrollment = enrollments
            .iter_mut()
            .find(|e| e.id == enrollment_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        if let Some(status) = patch.status {
            enrollment.status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            enrollment.payment_status = payment_status;
        }
        if let Some(payment_method) = patch.payment_method {
            enrollment.payment_method = payment_method;
        }
        if patch.transaction_id.is_some() {
            enrollment.transaction_id = patch.transaction_id;
        }
        if let Some(data) = patch.payment_gateway_data {
            enrollment.payment_gateway_data = Some(Json(data));
        }
        if let Some(auto_renew) = patch.auto_renew {
            enrollment.auto_renew = auto_renew;
        }
        if patch.cancelled_at.is_some() {
            enrollment.cancelled_at = patch.cancelled_at;
        }
        if patch.cancel_reason.is_some() {
            enrollment.cancel_reason = patch.cancel_reason;
        }
        if patch.notes.is_some() {
            enrollment.notes = patch.notes;
        }
        enrollment.updated_at = Utc::now();
        Ok(enrollment.clone())
    }

    async fn expire_enrollments(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let mut enrollments = self.enrollments.write().await;
        let mut expired = 0;

        for enrollment in enrollments.iter_mut() {
            let due = enrollment.end_date.map_or(false, |end| end < now);
            if enrollment.status == EnrollmentStatus::Active && due {
                enrollment.status = EnrollmentStatus::Expired;
                enrollment.updated_at = now;
                expired += 1;
            }
        }

        Ok(expired)
    }
}
