//! Link validator: classify each reference against the immutable index.

use crate::index::DocumentIndex;
use crate::types::{Reference, Status, ValidationResult};

/// Classify one reference as `Ok`, `BrokenLink`, or `BrokenAnchor`.
///
/// `BrokenLink` means the target document does not exist in the index;
/// `BrokenAnchor` means the target document exists but the anchor is not
/// in its anchor set. Validation is order-independent because the index
/// is fully built and immutable before the first call.
pub fn validate(reference: &Reference, index: &DocumentIndex) -> ValidationResult {
    let resolved = index.resolve(&reference.source, &reference.path);

    let Some(key) = resolved.key else {
        return ValidationResult {
            reference: reference.clone(),
            resolved: None,
            status: Status::BrokenLink,
            warning: resolved.warning,
        };
    };

    // Anchor-less assets (non-markdown targets) satisfy plain links but
    // never an anchor request.
    let status = match &reference.anchor {
        None => Status::Ok,
        Some(anchor) => {
            let anchor_exists = index
                .get(&key)
                .is_some_and(|target| target.anchors.contains(anchor.as_str()));
            if anchor_exists { Status::Ok } else { Status::BrokenAnchor }
        },
    };

    ValidationResult {
        reference: reference.clone(),
        resolved: Some(key),
        status,
        warning: resolved.warning,
    }
}
