//! # Finalizers
//!
//! Helpers for the operator's finalizer marker. They only edit the in-memory
//! object; persisting is the caller's job.

use kube::Resource;

/// Whether `finalizer` is present on the object
pub fn contains<K: Resource>(obj: &K, finalizer: &str) -> bool {
    obj.meta()
        .finalizers
        .as_ref()
        .is_some_and(|finalizers| finalizers.iter().any(|f| f == finalizer))
}

/// Add `finalizer`; returns `true` if the object changed
pub fn add<K: Resource>(obj: &mut K, finalizer: &str) -> bool {
    if contains(obj, finalizer) {
        return false;
    }
    obj.meta_mut()
        .finalizers
        .get_or_insert_with(Vec::new)
        .push(finalizer.to_string());
    true
}

/// Remove `finalizer`; returns `true` if the object changed
pub fn remove<K: Resource>(obj: &mut K, finalizer: &str) -> bool {
    let Some(finalizers) = obj.meta_mut().finalizers.as_mut() else {
        return false;
    };
    let before = finalizers.len();
    finalizers.retain(|f| f != finalizer);
    before != finalizers.len()
}

/// Whether deletion of the object has been requested
pub fn is_deleting<K: Resource>(obj: &K) -> bool {
    obj.meta().deletion_timestamp.is_some()
}
