use sea_orm::*;
use thiserror::Error;
use uuid::Uuid;

use crate::models::jobs::{self, JobStatus};
use crate::models::offers;
use crate::models::users;

/// Fraction of the accepted bid each party deposits into escrow.
pub const ESCROW_RATE: f64 = 0.3;

/// The per-party escrow deposit for a bid of `amount` points.
pub fn escrow_deposit(amount: f64) -> f64 {
    amount * ESCROW_RATE
}

/// How a cancelled Processing job's fund is returned: each party gets its
/// own deposit back.
pub fn split_refund(fund: f64) -> (f64, f64) {
    let half = fund / 2.0;
    (half, fund - half)
}

#[derive(Debug, Error)]
pub enum EscrowError {
    #[error("Job not found")]
    JobNotFound,
    #[error("Offer not found")]
    OfferNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("You are not the owner of this job")]
    NotOwner,
    #[error("Job is {0:?}, only open jobs can accept an offer")]
    JobNotOpen(JobStatus),
    #[error("Job is {0:?}, only processing jobs can be settled")]
    JobNotProcessing(JobStatus),
    #[error("Job is {0:?} and can not be cancelled")]
    JobNotCancellable(JobStatus),
    #[error("Offer has already been accepted")]
    OfferAlreadyAccepted,
    #[error("Offer does not belong to this job")]
    OfferJobMismatch,
    #[error("The {party} does not have enough points for the escrow deposit")]
    InsufficientPoints { party: &'static str },
    #[error("Processing job has no assignment record")]
    MissingAssignment,
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Validate every precondition for accepting `offer` on `job` and return the
/// per-party deposit. Pure so the rules are testable without a database; the
/// transaction re-runs this against freshly read rows.
pub fn check_acceptance(
    job: &jobs::Model,
    offer: &offers::Model,
    employer: &users::Model,
    freelancer: &users::Model,
) -> Result<f64, EscrowError> {
    if job.owner_id != employer.id {
        return Err(EscrowError::NotOwner);
    }
    if job.status != JobStatus::Open || job.assigned_freelancer_id.is_some() {
        return Err(EscrowError::JobNotOpen(job.status));
    }
    if offer.job_id != job.id {
        return Err(EscrowError::OfferJobMismatch);
    }
    if offer.is_accepted {
        return Err(EscrowError::OfferAlreadyAccepted);
    }

    let deposit = escrow_deposit(offer.amount);
    if employer.points < deposit {
        return Err(EscrowError::InsufficientPoints { party: "employer" });
    }
    if freelancer.points < deposit {
        return Err(EscrowError::InsufficientPoints { party: "freelancer" });
    }

    Ok(deposit)
}

/// Accept an offer: debit both parties' deposits, fund the escrow, attach
/// the assignment and move the job to Processing — atomically.
///
/// Every row is read with `SELECT ... FOR UPDATE` inside the transaction, so
/// a concurrent acceptance or spend blocks on the row locks, re-reads the
/// committed state and then fails its own precondition check instead of
/// double-accepting or double-spending.
pub async fn select_freelancer(
    db: &DatabaseConnection,
    job_id: Uuid,
    offer_id: Uuid,
    employer_id: Uuid,
) -> Result<(jobs::Model, users::Model), TransactionError<EscrowError>> {
    db.transaction::<_, (jobs::Model, users::Model), EscrowError>(move |txn| {
        Box::pin(async move {
            let job = jobs::Entity::find_by_id(job_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(EscrowError::JobNotFound)?;
            let offer = offers::Entity::find_by_id(offer_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(EscrowError::OfferNotFound)?;
            let employer = users::Entity::find_by_id(employer_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(EscrowError::UserNotFound)?;
            let freelancer = users::Entity::find_by_id(offer.freelancer_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(EscrowError::UserNotFound)?;

            let deposit = check_acceptance(&job, &offer, &employer, &freelancer)?;
            let deadline = chrono::Utc::now() + chrono::Duration::days(job.duration as i64);

            let employer_points = employer.points - deposit;
            let mut employer_active: users::ActiveModel = employer.into();
            employer_active.points = Set(employer_points);
            employer_active.update(txn).await?;

            let freelancer_points = freelancer.points - deposit;
            let mut freelancer_active: users::ActiveModel = freelancer.into();
            freelancer_active.points = Set(freelancer_points);
            let freelancer = freelancer_active.update(txn).await?;

            let mut offer_active: offers::ActiveModel = offer.into();
            offer_active.is_accepted = Set(true);
            let offer = offer_active.update(txn).await?;

            let mut job_active: jobs::ActiveModel = job.into();
            job_active.status = Set(JobStatus::Processing);
            job_active.assigned_freelancer_id = Set(Some(offer.freelancer_id));
            job_active.assigned_offer_id = Set(Some(offer.id));
            job_active.deadline = Set(Some(deadline));
            job_active.escrow_fund = Set(2.0 * deposit);
            let job = job_active.update(txn).await?;

            Ok((job, freelancer))
        })
    })
    .await
}

/// Close a Processing job: release the whole escrow fund to the assigned
/// freelancer (their collateral back plus the employer's payment).
pub async fn complete_job(
    db: &DatabaseConnection,
    job_id: Uuid,
    employer_id: Uuid,
) -> Result<jobs::Model, TransactionError<EscrowError>> {
    db.transaction::<_, jobs::Model, EscrowError>(move |txn| {
        Box::pin(async move {
            let job = jobs::Entity::find_by_id(job_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(EscrowError::JobNotFound)?;

            if job.owner_id != employer_id {
                return Err(EscrowError::NotOwner);
            }
            if job.status != JobStatus::Processing {
                return Err(EscrowError::JobNotProcessing(job.status));
            }
            let freelancer_id = job
                .assigned_freelancer_id
                .ok_or(EscrowError::MissingAssignment)?;

            let freelancer = users::Entity::find_by_id(freelancer_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(EscrowError::UserNotFound)?;

            let credited = freelancer.points + job.escrow_fund;
            let mut freelancer_active: users::ActiveModel = freelancer.into();
            freelancer_active.points = Set(credited);
            freelancer_active.update(txn).await?;

            let mut job_active: jobs::ActiveModel = job.into();
            job_active.escrow_fund = Set(0.0);
            job_active.status = Set(JobStatus::Closed);

            Ok(job_active.update(txn).await?)
        })
    })
    .await
}

/// Cancel a job. An Open job just flips to Cancelled; a Processing job
/// refunds each party its deposit first.
///
/// The status is checked on the locked row inside the transaction, so a job
/// accepted concurrently is seen as Processing and unwound with its refunds
/// rather than stranding the escrow fund.
pub async fn cancel_job(
    db: &DatabaseConnection,
    job_id: Uuid,
    employer_id: Uuid,
) -> Result<jobs::Model, TransactionError<EscrowError>> {
    db.transaction::<_, jobs::Model, EscrowError>(move |txn| {
        Box::pin(async move {
            let job = jobs::Entity::find_by_id(job_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(EscrowError::JobNotFound)?;

            if job.owner_id != employer_id {
                return Err(EscrowError::NotOwner);
            }

            match job.status {
                JobStatus::Open => {
                    let mut job_active: jobs::ActiveModel = job.into();
                    job_active.status = Set(JobStatus::Cancelled);

                    Ok(job_active.update(txn).await?)
                }
                JobStatus::Processing => {
                    let freelancer_id = job
                        .assigned_freelancer_id
                        .ok_or(EscrowError::MissingAssignment)?;

                    let employer = users::Entity::find_by_id(job.owner_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(EscrowError::UserNotFound)?;
                    let freelancer = users::Entity::find_by_id(freelancer_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(EscrowError::UserNotFound)?;

                    let (employer_refund, freelancer_refund) = split_refund(job.escrow_fund);

                    let refunded = employer.points + employer_refund;
                    let mut employer_active: users::ActiveModel = employer.into();
                    employer_active.points = Set(refunded);
                    employer_active.update(txn).await?;

                    let refunded = freelancer.points + freelancer_refund;
                    let mut freelancer_active: users::ActiveModel = freelancer.into();
                    freelancer_active.points = Set(refunded);
                    freelancer_active.update(txn).await?;

                    let mut job_active: jobs::ActiveModel = job.into();
                    job_active.escrow_fund = Set(0.0);
                    job_active.status = Set(JobStatus::Cancelled);

                    Ok(job_active.update(txn).await?)
                }
                status => Err(EscrowError::JobNotCancellable(status)),
            }
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{Role, UserStatus};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user(role: Role, points: f64) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            avatar_url: None,
            role,
            status: UserStatus::Active,
            email_confirmed: true,
            points,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn open_job(owner: &users::Model) -> jobs::Model {
        jobs::Model {
            id: Uuid::new_v4(),
            title: "Build a landing page".to_string(),
            description: "Static site, one week".to_string(),
            attachment_url: None,
            close_time: 7,
            duration: 14,
            min_price: 50.0,
            max_price: 200.0,
            category_id: Uuid::new_v4(),
            owner_id: owner.id,
            status: JobStatus::Open,
            assigned_freelancer_id: None,
            assigned_offer_id: None,
            deadline: None,
            escrow_fund: 0.0,
            created_at: Utc::now(),
        }
    }

    fn offer_on(job: &jobs::Model, freelancer: &users::Model, amount: f64) -> offers::Model {
        offers::Model {
            id: Uuid::new_v4(),
            job_id: job.id,
            freelancer_id: freelancer.id,
            amount,
            message: "I can do this".to_string(),
            is_accepted: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn deposit_is_a_fraction_of_the_bid() {
        assert_eq!(escrow_deposit(100.0), 30.0);
        assert_eq!(escrow_deposit(0.0), 0.0);
    }

    #[test]
    fn refund_split_conserves_the_fund() {
        let (a, b) = split_refund(60.0);
        assert_eq!(a + b, 60.0);
        assert_eq!(a, 30.0);

        let (a, b) = split_refund(0.1);
        assert_eq!(a + b, 0.1);
    }

    #[test]
    fn acceptance_succeeds_with_sufficient_balances() {
        let employer = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 100.0);
        let job = open_job(&employer);
        let offer = offer_on(&job, &freelancer, 100.0);

        let deposit = check_acceptance(&job, &offer, &employer, &freelancer).unwrap();
        assert_eq!(deposit, 30.0);
    }

    #[test]
    fn acceptance_rejects_non_owner() {
        let employer = user(Role::Employer, 100.0);
        let stranger = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 100.0);
        let job = open_job(&employer);
        let offer = offer_on(&job, &freelancer, 100.0);

        let err = check_acceptance(&job, &offer, &stranger, &freelancer).unwrap_err();
        assert!(matches!(err, EscrowError::NotOwner));
    }

    #[test]
    fn acceptance_rejects_non_open_job() {
        let employer = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 100.0);
        let mut job = open_job(&employer);
        job.status = JobStatus::Processing;
        let offer = offer_on(&job, &freelancer, 100.0);

        let err = check_acceptance(&job, &offer, &employer, &freelancer).unwrap_err();
        assert!(matches!(err, EscrowError::JobNotOpen(JobStatus::Processing)));
    }

    #[test]
    fn acceptance_rejects_already_assigned_job() {
        let employer = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 100.0);
        let mut job = open_job(&employer);
        job.assigned_freelancer_id = Some(Uuid::new_v4());
        let offer = offer_on(&job, &freelancer, 100.0);

        assert!(check_acceptance(&job, &offer, &employer, &freelancer).is_err());
    }

    #[test]
    fn acceptance_rejects_accepted_offer() {
        let employer = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 100.0);
        let job = open_job(&employer);
        let mut offer = offer_on(&job, &freelancer, 100.0);
        offer.is_accepted = true;

        let err = check_acceptance(&job, &offer, &employer, &freelancer).unwrap_err();
        assert!(matches!(err, EscrowError::OfferAlreadyAccepted));
    }

    #[test]
    fn acceptance_rejects_offer_for_another_job() {
        let employer = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 100.0);
        let job = open_job(&employer);
        let other_job = open_job(&employer);
        let offer = offer_on(&other_job, &freelancer, 100.0);

        let err = check_acceptance(&job, &offer, &employer, &freelancer).unwrap_err();
        assert!(matches!(err, EscrowError::OfferJobMismatch));
    }

    #[test]
    fn acceptance_rejects_poor_employer() {
        let employer = user(Role::Employer, 29.9);
        let freelancer = user(Role::Freelancer, 100.0);
        let job = open_job(&employer);
        let offer = offer_on(&job, &freelancer, 100.0);

        let err = check_acceptance(&job, &offer, &employer, &freelancer).unwrap_err();
        assert!(matches!(
            err,
            EscrowError::InsufficientPoints { party: "employer" }
        ));
    }

    #[test]
    fn acceptance_rejects_poor_freelancer() {
        let employer = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 0.0);
        let job = open_job(&employer);
        let offer = offer_on(&job, &freelancer, 100.0);

        let err = check_acceptance(&job, &offer, &employer, &freelancer).unwrap_err();
        assert!(matches!(
            err,
            EscrowError::InsufficientPoints { party: "freelancer" }
        ));
    }

    #[test]
    fn balance_exactly_at_deposit_is_enough() {
        let employer = user(Role::Employer, 30.0);
        let freelancer = user(Role::Freelancer, 30.0);
        let job = open_job(&employer);
        let offer = offer_on(&job, &freelancer, 100.0);

        assert!(check_acceptance(&job, &offer, &employer, &freelancer).is_ok());
    }

    // The transactional operations re-run their precondition checks against
    // the rows as read under the transaction's row locks. These tests feed
    // the transaction a row state that changed after the handler's earlier,
    // unlocked read.

    #[tokio::test]
    async fn acceptance_rechecks_status_on_the_locked_row() {
        let employer = user(Role::Employer, 100.0);
        let freelancer = user(Role::Freelancer, 100.0);
        let mut job = open_job(&employer);
        let offer = offer_on(&job, &freelancer, 100.0);
        // A competing acceptance committed first.
        job.status = JobStatus::Processing;
        job.assigned_freelancer_id = Some(Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[job.clone()]])
            .append_query_results([[offer.clone()]])
            .append_query_results([[employer.clone()]])
            .append_query_results([[freelancer.clone()]])
            .into_connection();

        let err = select_freelancer(&db, job.id, offer.id, employer.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Transaction(EscrowError::JobNotOpen(JobStatus::Processing))
        ));
    }

    #[tokio::test]
    async fn cancel_rejects_terminal_status_on_the_locked_row() {
        let employer = user(Role::Employer, 100.0);
        let mut job = open_job(&employer);
        job.status = JobStatus::Closed;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[job.clone()]])
            .into_connection();

        let err = cancel_job(&db, job.id, employer.id).await.unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Transaction(EscrowError::JobNotCancellable(JobStatus::Closed))
        ));
    }

    #[tokio::test]
    async fn cancelling_an_open_job_flips_it_to_cancelled() {
        let employer = user(Role::Employer, 100.0);
        let job = open_job(&employer);
        let mut cancelled = job.clone();
        cancelled.status = JobStatus::Cancelled;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[job.clone()]])
            .append_query_results([[cancelled]])
            .into_connection();

        let result = cancel_job(&db, job.id, employer.id).await.unwrap();
        assert_eq!(result.status, JobStatus::Cancelled);
    }
}
