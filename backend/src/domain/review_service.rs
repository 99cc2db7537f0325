use log::info;
use shared::{
    DeleteRequestResponse, DeleteResultResponse, Review, ReviewForm, ReviewResponse, ReviewStatus, ReviewView,
};

use crate::domain::collection::CollectionManager;
use crate::domain::delete_flow;
use crate::domain::models::{CollectionResult, TransitionPolicy};
use crate::domain::notification::{DomainEvent, EventBus};
use crate::domain::settings_service::SettingsService;

const NEW_REVIEW_LABEL: &str = "Just now";

/// Service for client testimonials and their moderation
#[derive(Clone)]
pub struct ReviewService {
    reviews: CollectionManager<Review>,
    settings: SettingsService,
    events: EventBus,
    policy: TransitionPolicy,
}

impl ReviewService {
    pub fn new(
        reviews: CollectionManager<Review>,
        settings: SettingsService,
        events: EventBus,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            reviews,
            settings,
            events,
            policy,
        }
    }

    /// Admin grid. `All` hides rejected reviews.
    pub async fn list(&self, view: ReviewView) -> CollectionResult<Vec<Review>> {
        let reviews = self.reviews.list().await?;
        Ok(reviews
            .into_iter()
            .filter(|r| match view {
                ReviewView::All => r.status != ReviewStatus::Rejected,
                ReviewView::Approved => r.status == ReviewStatus::Approved,
                ReviewView::Pending => r.status == ReviewStatus::Pending,
                ReviewView::Rejected => r.status == ReviewStatus::Rejected,
            })
            .collect())
    }

    /// What the public site shows
    pub async fn list_approved(&self) -> CollectionResult<Vec<Review>> {
        self.list(ReviewView::Approved).await
    }

    pub async fn get(&self, id: &str) -> CollectionResult<Review> {
        self.reviews.get(id).await
    }

    fn from_form(form: ReviewForm, status: ReviewStatus) -> Review {
        Review {
            id: String::new(),
            author_name: form.author_name.trim().to_string(),
            service_name: form.service_name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            rating: form.rating,
            comment: form.comment.trim().to_string(),
            images: form
                .images
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            date_label: form
                .date_label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| NEW_REVIEW_LABEL.to_string()),
            status,
        }
    }

    /// Public submission. Starts pending unless reviews are auto-approved;
    /// any status on the form is ignored.
    pub async fn submit(&self, form: ReviewForm) -> CollectionResult<ReviewResponse> {
        info!("Review submitted by {}", form.author_name);
        let settings = self.settings.get().await?;
        let status = if settings.auto_approve_reviews {
            ReviewStatus::Approved
        } else {
            ReviewStatus::Pending
        };

        let review = self
            .reviews
            .create(Self::from_form(
                ReviewForm {
                    date_label: None,
                    ..form
                },
                status,
            ))
            .await?;
        self.events.publish(DomainEvent::ReviewSubmitted { review: review.clone() });

        let success_message = match review.status {
            ReviewStatus::Approved => "Thank you for your review!".to_string(),
            _ => "Thank you for your review! It will appear once approved.".to_string(),
        };
        Ok(ReviewResponse { review, success_message })
    }

    /// Admin create; the form may set any status
    pub async fn create(&self, form: ReviewForm) -> CollectionResult<ReviewResponse> {
        info!("Creating review: author={}", form.author_name);
        let status = form.status.unwrap_or(ReviewStatus::Pending);
        let review = self.reviews.create(Self::from_form(form, status)).await?;
        Ok(ReviewResponse {
            success_message: format!("Review by {} has been added.", review.author_name),
            review,
        })
    }

    /// Admin edit. Status defaulting and the transition check read the stored
    /// record inside the same locked write as the replace.
    pub async fn update(&self, id: &str, form: ReviewForm) -> CollectionResult<ReviewResponse> {
        info!("Updating review: {}", id);
        let policy = self.policy;
        let (_, review) = self
            .reviews
            .modify(id, |current| {
                let status = form.status.unwrap_or(current.status);
                policy.check(current.status, status)?;
                let date_label = form.date_label.clone().or_else(|| Some(current.date_label.clone()));
                Ok(Self::from_form(ReviewForm { date_label, ..form }, status))
            })
            .await?;
        Ok(ReviewResponse {
            success_message: format!("Review by {} has been updated.", review.author_name),
            review,
        })
    }

    /// Set exactly the status field
    pub async fn set_status(&self, id: &str, status: ReviewStatus) -> CollectionResult<ReviewResponse> {
        let policy = self.policy;
        let (_, review) = self
            .reviews
            .transition(id, |current| {
                policy.check(current.status, status)?;
                Ok(Review {
                    status,
                    ..current.clone()
                })
            })
            .await?;
        info!("Review {} is now {}", review.id, review.status);
        Ok(ReviewResponse {
            success_message: format!("Review {}.", review.status),
            review,
        })
    }

    pub async fn request_delete(&self, id: &str) -> CollectionResult<DeleteRequestResponse> {
        delete_flow::request(&self.reviews, id).await
    }

    pub async fn confirm_delete(&self) -> CollectionResult<DeleteResultResponse> {
        let deleted = self.reviews.confirm_delete().await?;
        Ok(delete_flow::confirmed(deleted.as_ref()))
    }

    pub fn cancel_delete(&self) -> DeleteResultResponse {
        delete_flow::cancelled(&self.reviews)
    }
}
