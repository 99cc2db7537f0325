//! Response shapes for the two-phase delete shared by every collection.

use shared::{DeleteRequestResponse, DeleteResultResponse};

use crate::domain::collection::CollectionManager;
use crate::domain::models::{CollectionResult, Entity, Validate};

fn capitalized_kind<T: Entity>() -> String {
    let mut chars = T::KIND.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn request<T: Entity + Validate>(
    manager: &CollectionManager<T>,
    id: &str,
) -> CollectionResult<DeleteRequestResponse> {
    let target = manager.request_delete(id).await?;
    Ok(DeleteRequestResponse {
        pending_id: target.id().to_string(),
        confirmation_message: format!(
            "Are you sure you want to delete {}? This action cannot be undone.",
            target.label()
        ),
    })
}

pub fn confirmed<T: Entity>(deleted: Option<&T>) -> DeleteResultResponse {
    match deleted {
        Some(entity) => DeleteResultResponse {
            deleted_id: Some(entity.id().to_string()),
            success_message: format!("{} deleted successfully", capitalized_kind::<T>()),
        },
        None => DeleteResultResponse {
            deleted_id: None,
            success_message: "Nothing to delete".to_string(),
        },
    }
}

pub fn cancelled<T: Entity + Validate>(manager: &CollectionManager<T>) -> DeleteResultResponse {
    let message = match manager.cancel_delete() {
        Some(_) => "Delete cancelled",
        None => "Nothing to cancel",
    };
    DeleteResultResponse {
        deleted_id: None,
        success_message: message.to_string(),
    }
}
