use log::info;
use shared::{DeleteRequestResponse, DeleteResultResponse, Offer, OfferForm, OfferResponse};

use crate::domain::collection::CollectionManager;
use crate::domain::delete_flow;
use crate::domain::models::CollectionResult;

/// Service for promotional offers. Only active offers are shown publicly.
#[derive(Clone)]
pub struct OfferService {
    offers: CollectionManager<Offer>,
}

impl OfferService {
    pub fn new(offers: CollectionManager<Offer>) -> Self {
        Self { offers }
    }

    pub async fn list(&self) -> CollectionResult<Vec<Offer>> {
        self.offers.list().await
    }

    pub async fn list_active(&self) -> CollectionResult<Vec<Offer>> {
        Ok(self.offers.list().await?.into_iter().filter(|o| o.is_active).collect())
    }

    pub async fn get(&self, id: &str) -> CollectionResult<Offer> {
        self.offers.get(id).await
    }

    fn from_form(form: OfferForm) -> Offer {
        Offer {
            id: String::new(),
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            discount_label: form.discount_label.trim().to_string(),
            validity_label: form.validity_label.trim().to_string(),
            terms: form.terms.trim().to_string(),
            is_active: form.is_active,
        }
    }

    pub async fn create(&self, form: OfferForm) -> CollectionResult<OfferResponse> {
        info!("Creating offer: title={}", form.title);
        let offer = self.offers.create(Self::from_form(form)).await?;
        Ok(OfferResponse {
            success_message: format!("{} has been added successfully.", offer.title),
            offer,
        })
    }

    pub async fn update(&self, id: &str, form: OfferForm) -> CollectionResult<OfferResponse> {
        info!("Updating offer: {}", id);
        let offer = self.offers.update(id, Self::from_form(form)).await?;
        Ok(OfferResponse {
            success_message: format!("{} has been updated successfully.", offer.title),
            offer,
        })
    }

    /// Flip `is_active` and nothing else
    pub async fn toggle_active(&self, id: &str) -> CollectionResult<OfferResponse> {
        let (_, offer) = self
            .offers
            .transition(id, |current| {
                Ok(Offer {
                    is_active: !current.is_active,
                    ..current.clone()
                })
            })
            .await?;
        let state = if offer.is_active { "activated" } else { "deactivated" };
        info!("Offer {} {}", offer.id, state);
        Ok(OfferResponse {
            success_message: format!("{} has been {}.", offer.title, state),
            offer,
        })
    }

    pub async fn request_delete(&self, id: &str) -> CollectionResult<DeleteRequestResponse> {
        delete_flow::request(&self.offers, id).await
    }

    pub async fn confirm_delete(&self) -> CollectionResult<DeleteResultResponse> {
        let deleted = self.offers.confirm_delete().await?;
        Ok(delete_flow::confirmed(deleted.as_ref()))
    }

    pub fn cancel_delete(&self) -> DeleteResultResponse {
        delete_flow::cancelled(&self.offers)
    }
}
