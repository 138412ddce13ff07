use crate::entities::Identified;

/// Returns a copy of `items` where the record with `id` is replaced by
/// `patch(record)`. Order is preserved and the input is left untouched; an
/// unknown id yields an unchanged copy.
pub fn merge_by_id<T, F>(items: &[T], id: &str, patch: F) -> Vec<T>
where
    T: Identified + Clone,
    F: FnOnce(&T) -> T,
{
    let mut patch = Some(patch);
    items
        .iter()
        .map(|item| match patch.take_if(|_| item.id() == id) {
            Some(apply) => apply(item),
            None => item.clone(),
        })
        .collect()
}
