// service/enrollment_service.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::Store,
    dtos::enrollmentdtos::{CreateEnrollmentDto, EnrollmentCheckDto, UpdateEnrollmentStatusDto},
    models::{
        enrollmentmodel::{
            Enrollment, EnrollmentFilter, EnrollmentPatch, EnrollmentStatus, EnrollmentWithDetails,
            NewEnrollment, PaymentGatewayData, PaymentMethod, PaymentStatus,
        },
        usermodel::User,
    },
};

use super::{
    access::{ensure_owner_or_admin, require_admin},
    error::ServiceError,
};

const DEFAULT_CANCEL_REASON: &str = "User requested cancellation";

pub struct EnrollmentService {
    db_client: Arc<dyn Store>,
    currency: String,
}

/// Reconciles an optional method with optional gateway data. Data wins when the method is absent.
fn resolve_payment_method(
    method: Option<PaymentMethod>,
    data: Option<&PaymentGatewayData>,
) -> Result<Option<PaymentMethod>, ServiceError> {
    match (method, data.map(PaymentGatewayData::method)) {
        (Some(method), Some(data_method)) if method != data_method => {
            Err(ServiceError::PaymentMethodMismatch { method, data_method })
        }
        (Some(method), _) => Ok(Some(method)),
        (None, data_method) => Ok(data_method),
    }
}

impl EnrollmentService {
    pub fn new(db_client: Arc<dyn Store>, currency: String) -> Self {
        Self { db_client, currency }
    }

    async fn find_enrollment(&self, enrollment_id: Uuid) -> Result<Enrollment, ServiceError> {
        self.db_client
            .get_enrollment(enrollment_id)
            .await?
            .ok_or(ServiceError::EnrollmentNotFound(enrollment_id))
    }

    pub async fn create_enrollment(
        &self,
        actor: &User,
        body: CreateEnrollmentDto,
    ) -> Result<Enrollment, ServiceError> {
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let payment_method =
            resolve_payment_method(body.payment_method, body.payment_gateway_data.as_ref())?
                .unwrap_or_default();

        self.db_client
            .get_service(body.service_id)
            .await?
            .ok_or(ServiceError::ServiceNotFound(body.service_id))?;

        let plan = self
            .db_client
            .get_plan(body.plan_id)
            .await?
            .ok_or(ServiceError::PlanNotFound(body.plan_id))?;

        if plan.service_id != body.service_id {
            return Err(ServiceError::PlanNotBelongingToService {
                plan_id: plan.id,
                service_id: body.service_id,
            });
        }
        if !plan.is_active {
            return Err(ServiceError::PlanInactive(plan.id));
        }

        // Read-then-write: two concurrent creates can both pass this check.
        if self
            .db_client
            .get_active_enrollment(actor.id, body.service_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::AlreadyEnrolled);
        }

        let (status, payment_status) = if body.is_test_mode.unwrap_or(false) {
            (EnrollmentStatus::Active, PaymentStatus::Test)
        } else {
            (EnrollmentStatus::Pending, PaymentStatus::Pending)
        };

        let start_date = Utc::now();
        let end_date = plan.billing_period.end_date(start_date);

        let enrollment = self
            .db_client
            .create_enrollment(NewEnrollment {
                user_id: actor.id,
                service_id: body.service_id,
                plan_id: plan.id,
                status,
                payment_status,
                payment_method,
                transaction_id: body.transaction_id,
                payment_gateway_data: body.payment_gateway_data,
                amount: plan.price,
                currency: self.currency.clone(),
                billing_period: plan.billing_period,
                start_date,
                end_date,
                next_billing_date: end_date,
                auto_renew: plan.billing_period.renews(),
                notes: body.notes,
            })
            .await?;

        tracing::info!(
            "Enrollment {} created for user {} on plan {} ({})",
            enrollment.id,
            actor.id,
            plan.id,
            enrollment.status.to_str()
        );
        Ok(enrollment)
    }

    pub async fn update_enrollment_status(
        &self,
        actor: &User,
        enrollment_id: Uuid,
        body: UpdateEnrollmentStatusDto,
    ) -> Result<Enrollment, ServiceError> {
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let enrollment = self.find_enrollment(enrollment_id).await?;
        ensure_owner_or_admin(actor, enrollment.user_id)?;

        if let Some(next) = body.status {
            if !enrollment.status.can_transition_to(next) {
                return Err(ServiceError::InvalidStatusTransition {
                    from: enrollment.status,
                    to: next,
                });
            }

            if next == EnrollmentStatus::Active && enrollment.status != EnrollmentStatus::Active {
                let existing = self
                    .db_client
                    .get_active_enrollment(enrollment.user_id, enrollment.service_id)
                    .await?;
                if existing.map_or(false, |e| e.id != enrollment.id) {
                    return Err(ServiceError::AlreadyEnrolled);
                }
            }
        }

        let payment_method = body
            .payment_gateway_data
            .as_ref()
            .map(PaymentGatewayData::method);

        let cancelled = body.status == Some(EnrollmentStatus::Cancelled)
            && enrollment.status != EnrollmentStatus::Cancelled;

        let updated = self
            .db_client
            .update_enrollment(
                enrollment_id,
                EnrollmentPatch {
                    status: body.status,
                    payment_status: body.payment_status,
                    payment_method,
                    transaction_id: body.transaction_id,
                    payment_gateway_data: body.payment_gateway_data,
                    auto_renew: cancelled.then_some(false),
                    cancelled_at: cancelled.then(Utc::now),
                    cancel_reason: cancelled.then(|| DEFAULT_CANCEL_REASON.to_string()),
                    notes: body.notes,
                    ..Default::default()
                },
            )
            .await?;

        if updated.status != enrollment.status {
            tracing::info!(
                "Enrollment {} moved from {} to {} by {}",
                enrollment_id,
                enrollment.status.to_str(),
                updated.status.to_str(),
                actor.id
            );
        }
        Ok(updated)
    }

    pub async fn cancel_enrollment(
        &self,
        actor: &User,
        enrollment_id: Uuid,
        cancel_reason: Option<String>,
    ) -> Result<Enrollment, ServiceError> {
        let enrollment = self.find_enrollment(enrollment_id).await?;
        ensure_owner_or_admin(actor, enrollment.user_id)?;

        if enrollment.status == EnrollmentStatus::Cancelled {
            return Err(ServiceError::AlreadyCancelled);
        }

        let reason = cancel_reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string());

        let updated = self
            .db_client
            .update_enrollment(
                enrollment_id,
                EnrollmentPatch {
                    status: Some(EnrollmentStatus::Cancelled),
                    auto_renew: Some(false),
                    cancelled_at: Some(Utc::now()),
                    cancel_reason: Some(reason),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!("Enrollment {} cancelled by {}", enrollment_id, actor.id);
        Ok(updated)
    }

    pub async fn get_user_enrollments(&self, actor: &User) -> Result<Vec<Enrollment>, ServiceError> {
        Ok(self.db_client.get_user_enrollments(actor.id).await?)
    }

    /// Each enrollment joined with its service and plan. Either side is `None` once deleted.
    pub async fn get_user_enrollments_with_details(
        &self,
        actor: &User,
    ) -> Result<Vec<EnrollmentWithDetails>, ServiceError> {
        let enrollments = self.db_client.get_user_enrollments(actor.id).await?;

        let mut details = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            let service = self.db_client.get_service(enrollment.service_id).await?;
            let plan = self.db_client.get_plan(enrollment.plan_id).await?;
            details.push(EnrollmentWithDetails {
                enrollment,
                service,
                plan,
            });
        }

        Ok(details)
    }

    pub async fn get_enrollment(&self, actor: &User, enrollment_id: Uuid) -> Result<Enrollment, ServiceError> {
        let enrollment = self.find_enrollment(enrollment_id).await?;
        ensure_owner_or_admin(actor, enrollment.user_id)?;
        Ok(enrollment)
    }

    /// Whether a user (the caller unless an admin asks about someone else) has an active enrollment.
    pub async fn check_user_enrollment(
        &self,
        actor: &User,
        service_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<EnrollmentCheckDto, ServiceError> {
        let user_id = user_id.unwrap_or(actor.id);
        ensure_owner_or_admin(actor, user_id)?;

        let enrollment = self
            .db_client
            .get_active_enrollment(user_id, service_id)
            .await?;

        Ok(EnrollmentCheckDto {
            is_enrolled: enrollment.is_some(),
            enrollment,
        })
    }

    pub async fn get_all_enrollments(
        &self,
        actor: &User,
        filter: EnrollmentFilter,
    ) -> Result<Vec<Enrollment>, ServiceError> {
        require_admin(actor)?;
        Ok(self.db_client.get_enrollments(filter).await?)
    }

    /// Moves active enrollments past their end date to `expired`.
    pub async fn expire_due_enrollments(&self, now: DateTime<Utc>) -> Result<u64, ServiceError> {
        Ok(self.db_client.expire_enrollments(now).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{memorydb::MemoryStore, plandb::PlanExt, servicedb::ServiceExt},
        dtos::plandtos::UpdatePlanDto,
        models::{planmodel::BillingPeriod, usermodel::UserRole},
        service::{
            catalog_service::tests::{design_service, seed_user},
            plan_service::{tests::plan, PlanService},
        },
    };
    use chrono::{Duration, Months};

    struct Fixture {
        store: Arc<MemoryStore>,
        enrollments: EnrollmentService,
        admin: User,
        alice: User,
        bob: User,
        service_id: Uuid,
        pro_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let admin = seed_user(&store, "admin", UserRole::Admin).await;
        let alice = seed_user(&store, "alice", UserRole::User).await;
        let bob = seed_user(&store, "bob", UserRole::User).await;

        let service = store.create_service(design_service().into()).await.unwrap();
        let pro = store
            .create_plan(plan("Pro", 500_000, BillingPeriod::Monthly, 1).into_new_plan(service.id))
            .await
            .unwrap();

        Fixture {
            enrollments: EnrollmentService::new(store.clone(), "IDR".to_string()),
            store,
            admin,
            alice,
            bob,
            service_id: service.id,
            pro_id: pro.id,
        }
    }

    fn request(service_id: Uuid, plan_id: Uuid) -> CreateEnrollmentDto {
        CreateEnrollmentDto {
            service_id,
            plan_id,
            payment_method: None,
            transaction_id: None,
            payment_gateway_data: None,
            is_test_mode: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_pending_enrollment() {
        let f = fixture().await;

        let enrollment = f
            .enrollments
            .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
            .await
            .unwrap();

        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
        assert_eq!(enrollment.payment_status, PaymentStatus::Pending);
        assert_eq!(enrollment.payment_method, PaymentMethod::Manual);
        assert_eq!(enrollment.amount, 500_000);
        assert_eq!(enrollment.currency, "IDR");
        assert_eq!(enrollment.billing_period, BillingPeriod::Monthly);
        assert!(enrollment.auto_renew);
        assert_eq!(
            enrollment.end_date,
            enrollment.start_date.checked_add_months(Months::new(1))
        );
        assert_eq!(enrollment.next_billing_date, enrollment.end_date);
    }

    #[tokio::test]
    async fn test_test_mode_enrollment_is_active_and_blocks_second() {
        let f = fixture().await;

        let first = f
            .enrollments
            .create_enrollment(
                &f.alice,
                CreateEnrollmentDto {
                    is_test_mode: Some(true),
                    ..request(f.service_id, f.pro_id)
                },
            )
            .await
            .unwrap();
        assert_eq!(first.status, EnrollmentStatus::Active);
        assert_eq!(first.payment_status, PaymentStatus::Test);

        let check = f
            .enrollments
            .check_user_enrollment(&f.alice, f.service_id, None)
            .await
            .unwrap();
        assert!(check.is_enrolled);
        assert_eq!(check.enrollment.map(|e| e.id), Some(first.id));

        assert!(matches!(
            f.enrollments
                .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
                .await,
            Err(ServiceError::AlreadyEnrolled)
        ));

        // Another user is unaffected.
        assert!(f
            .enrollments
            .create_enrollment(&f.bob, request(f.service_id, f.pro_id))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_lifetime_enrollment_has_no_end() {
        let f = fixture().await;
        let lifetime = f
            .store
            .create_plan(plan("Forever", 5_000_000, BillingPeriod::Lifetime, 3).into_new_plan(f.service_id))
            .await
            .unwrap();

        let enrollment = f
            .enrollments
            .create_enrollment(&f.alice, request(f.service_id, lifetime.id))
            .await
            .unwrap();

        assert!(enrollment.end_date.is_none());
        assert!(enrollment.next_billing_date.is_none());
        assert!(!enrollment.auto_renew);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_references() {
        let f = fixture().await;
        let other = f.store.create_service(design_service().into()).await.unwrap();

        assert!(matches!(
            f.enrollments
                .create_enrollment(&f.alice, request(Uuid::new_v4(), f.pro_id))
                .await,
            Err(ServiceError::ServiceNotFound(_))
        ));
        assert!(matches!(
            f.enrollments
                .create_enrollment(&f.alice, request(f.service_id, Uuid::new_v4()))
                .await,
            Err(ServiceError::PlanNotFound(_))
        ));
        assert!(matches!(
            f.enrollments
                .create_enrollment(&f.alice, request(other.id, f.pro_id))
                .await,
            Err(ServiceError::PlanNotBelongingToService { .. })
        ));

        PlanService::new(f.store.clone())
            .update_plan(
                &f.admin,
                f.pro_id,
                UpdatePlanDto {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            f.enrollments
                .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
                .await,
            Err(ServiceError::PlanInactive(_))
        ));

        assert!(f.enrollments.get_user_enrollments(&f.alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_method_and_gateway_data_must_agree() {
        let f = fixture().await;
        let stripe = PaymentGatewayData::Stripe {
            payment_intent_id: "pi_123".to_string(),
            customer_id: None,
        };

        assert!(matches!(
            f.enrollments
                .create_enrollment(
                    &f.alice,
                    CreateEnrollmentDto {
                        payment_method: Some(PaymentMethod::Midtrans),
                        payment_gateway_data: Some(stripe.clone()),
                        ..request(f.service_id, f.pro_id)
                    },
                )
                .await,
            Err(ServiceError::PaymentMethodMismatch { .. })
        ));

        let enrollment = f
            .enrollments
            .create_enrollment(
                &f.alice,
                CreateEnrollmentDto {
                    payment_gateway_data: Some(stripe.clone()),
                    ..request(f.service_id, f.pro_id)
                },
            )
            .await
            .unwrap();
        assert_eq!(enrollment.payment_method, PaymentMethod::Stripe);
        assert_eq!(enrollment.payment_gateway_data.map(|d| d.0), Some(stripe));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let f = fixture().await;
        let enrollment = f
            .enrollments
            .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
            .await
            .unwrap();

        let active = f
            .enrollments
            .update_enrollment_status(
                &f.admin,
                enrollment.id,
                UpdateEnrollmentStatusDto {
                    status: Some(EnrollmentStatus::Active),
                    payment_status: Some(PaymentStatus::Paid),
                    transaction_id: Some("TRX-1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(active.status, EnrollmentStatus::Active);
        assert_eq!(active.payment_status, PaymentStatus::Paid);
        assert_eq!(active.transaction_id.as_deref(), Some("TRX-1"));

        // Payment metadata alone, status unchanged.
        let noted = f
            .enrollments
            .update_enrollment_status(
                &f.alice,
                enrollment.id,
                UpdateEnrollmentStatusDto {
                    notes: Some("Invoice sent".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(noted.status, EnrollmentStatus::Active);
        assert_eq!(noted.notes.as_deref(), Some("Invoice sent"));

        assert!(matches!(
            f.enrollments
                .update_enrollment_status(
                    &f.admin,
                    enrollment.id,
                    UpdateEnrollmentStatusDto {
                        status: Some(EnrollmentStatus::Pending),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::InvalidStatusTransition {
                from: EnrollmentStatus::Active,
                to: EnrollmentStatus::Pending
            })
        ));

        assert!(matches!(
            f.enrollments
                .update_enrollment_status(
                    &f.bob,
                    enrollment.id,
                    UpdateEnrollmentStatusDto {
                        status: Some(EnrollmentStatus::Cancelled),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::AccessDenied)
        ));
        assert_eq!(
            f.enrollments.get_enrollment(&f.alice, enrollment.id).await.unwrap().status,
            EnrollmentStatus::Active
        );
    }

    #[tokio::test]
    async fn test_activation_rechecks_single_active_enrollment() {
        let f = fixture().await;
        let first = f
            .enrollments
            .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
            .await
            .unwrap();
        let second = f
            .enrollments
            .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
            .await
            .unwrap();

        let activate = UpdateEnrollmentStatusDto {
            status: Some(EnrollmentStatus::Active),
            ..Default::default()
        };
        f.enrollments
            .update_enrollment_status(&f.admin, first.id, activate.clone())
            .await
            .unwrap();

        assert!(matches!(
            f.enrollments
                .update_enrollment_status(&f.admin, second.id, activate)
                .await,
            Err(ServiceError::AlreadyEnrolled)
        ));
    }

    #[tokio::test]
    async fn test_cancel_enrollment() {
        let f = fixture().await;
        let enrollment = f
            .enrollments
            .create_enrollment(
                &f.alice,
                CreateEnrollmentDto {
                    is_test_mode: Some(true),
                    ..request(f.service_id, f.pro_id)
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            f.enrollments.cancel_enrollment(&f.bob, enrollment.id, None).await,
            Err(ServiceError::AccessDenied)
        ));

        let cancelled = f
            .enrollments
            .cancel_enrollment(&f.alice, enrollment.id, None)
            .await
            .unwrap();
        assert_eq!(cancelled.status, EnrollmentStatus::Cancelled);
        assert_eq!(cancelled.cancel_reason.as_deref(), Some(DEFAULT_CANCEL_REASON));
        assert!(cancelled.cancelled_at.is_some());
        assert!(!cancelled.auto_renew);

        let again = f
            .enrollments
            .cancel_enrollment(&f.admin, enrollment.id, Some("Refund".to_string()))
            .await;
        assert!(matches!(again, Err(ServiceError::AlreadyCancelled)));

        let stored = f.enrollments.get_enrollment(&f.admin, enrollment.id).await.unwrap();
        assert_eq!(stored, cancelled);

        let check = f
            .enrollments
            .check_user_enrollment(&f.alice, f.service_id, None)
            .await
            .unwrap();
        assert!(!check.is_enrolled);
    }

    #[tokio::test]
    async fn test_status_patch_to_cancelled_matches_cancel() {
        let f = fixture().await;
        let enrollment = f
            .enrollments
            .create_enrollment(
                &f.alice,
                CreateEnrollmentDto {
                    is_test_mode: Some(true),
                    ..request(f.service_id, f.pro_id)
                },
            )
            .await
            .unwrap();
        assert!(enrollment.auto_renew);

        let cancelled = f
            .enrollments
            .update_enrollment_status(
                &f.alice,
                enrollment.id,
                UpdateEnrollmentStatusDto {
                    status: Some(EnrollmentStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(cancelled.status, EnrollmentStatus::Cancelled);
        assert_eq!(cancelled.cancel_reason.as_deref(), Some(DEFAULT_CANCEL_REASON));
        assert!(cancelled.cancelled_at.is_some());
        assert!(!cancelled.auto_renew);
    }

    #[tokio::test]
    async fn test_details_survive_deleted_plan() {
        let f = fixture().await;
        f.enrollments
            .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
            .await
            .unwrap();

        let details = f
            .enrollments
            .get_user_enrollments_with_details(&f.alice)
            .await
            .unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].plan.as_ref().map(|p| p.id), Some(f.pro_id));
        assert!(details[0].service.is_some());

        f.store.delete_plan(f.pro_id).await.unwrap();

        let details = f
            .enrollments
            .get_user_enrollments_with_details(&f.alice)
            .await
            .unwrap();
        assert!(details[0].plan.is_none());
        assert!(details[0].service.is_some());
    }

    #[tokio::test]
    async fn test_admin_queries() {
        let f = fixture().await;
        let pending = f
            .enrollments
            .create_enrollment(&f.alice, request(f.service_id, f.pro_id))
            .await
            .unwrap();
        f.enrollments
            .create_enrollment(
                &f.bob,
                CreateEnrollmentDto {
                    is_test_mode: Some(true),
                    ..request(f.service_id, f.pro_id)
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            f.enrollments.get_all_enrollments(&f.alice, EnrollmentFilter::All).await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(
            f.enrollments
                .check_user_enrollment(&f.alice, f.service_id, Some(f.bob.id))
                .await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(f
            .enrollments
            .check_user_enrollment(&f.admin, f.service_id, Some(f.bob.id))
            .await
            .unwrap()
            .is_enrolled);

        let all = f
            .enrollments
            .get_all_enrollments(&f.admin, EnrollmentFilter::All)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let only_pending = f
            .enrollments
            .get_all_enrollments(&f.admin, EnrollmentFilter::Status(EnrollmentStatus::Pending))
            .await
            .unwrap();
        assert_eq!(only_pending.len(), 1);
        assert_eq!(only_pending[0].id, pending.id);

        let test_payments = f
            .enrollments
            .get_all_enrollments(&f.admin, EnrollmentFilter::PaymentStatus(PaymentStatus::Test))
            .await
            .unwrap();
        assert_eq!(test_payments.len(), 1);
        assert_eq!(test_payments[0].user_id, f.bob.id);

        assert!(matches!(
            f.enrollments.get_enrollment(&f.bob, pending.id).await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(
            f.enrollments.get_enrollment(&f.admin, Uuid::new_v4()).await,
            Err(ServiceError::EnrollmentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_expire_due_enrollments() {
        let f = fixture().await;
        let monthly = f
            .enrollments
            .create_enrollment(
                &f.alice,
                CreateEnrollmentDto {
                    is_test_mode: Some(true),
                    ..request(f.service_id, f.pro_id)
                },
            )
            .await
            .unwrap();

        let expired = f
            .enrollments
            .expire_due_enrollments(Utc::now())
            .await
            .unwrap();
        assert_eq!(expired, 0);

        let expired = f
            .enrollments
            .expire_due_enrollments(Utc::now() + Duration::days(40))
            .await
            .unwrap();
        assert_eq!(expired, 1);
        assert_eq!(
            f.enrollments.get_enrollment(&f.alice, monthly.id).await.unwrap().status,
            EnrollmentStatus::Expired
        );
    }

    #[test]
    fn test_resolve_payment_method() {
        let xendit = PaymentGatewayData::Xendit {
            invoice_id: "inv_1".to_string(),
            external_id: None,
        };

        assert_eq!(resolve_payment_method(None, None).unwrap(), None);
        assert_eq!(
            resolve_payment_method(None, Some(&xendit)).unwrap(),
            Some(PaymentMethod::Xendit)
        );
        assert_eq!(
            resolve_payment_method(Some(PaymentMethod::Xendit), Some(&xendit)).unwrap(),
            Some(PaymentMethod::Xendit)
        );
        assert!(resolve_payment_method(Some(PaymentMethod::Manual), Some(&xendit)).is_err());
    }
}
