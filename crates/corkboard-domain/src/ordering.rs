//! Order model: explicit order-id arrays held by the parent entity are the
//! sole source of truth for child ordering.

use std::collections::HashSet;
use std::hash::Hash;

/// Stable array move. Returns the input unchanged when `from == to` or when
/// either index is out of bounds; never creates or destroys an element.
pub fn reorder<T: Clone>(sequence: &[T], from: usize, to: usize) -> Vec<T> {
    let mut result = sequence.to_vec();
    if from == to || from >= result.len() || to >= result.len() {
        return result;
    }
    let item = result.remove(from);
    result.insert(to, item);
    result
}

/// Arrange `items` to match an explicit order-id array. Items whose id does
/// not appear in `order_ids` keep their relative order at the tail.
pub fn sort_by_order<T, I, F>(items: Vec<T>, order_ids: &[I], id_fn: F) -> Vec<T>
where
    I: Eq + Hash,
    F: Fn(&T) -> I,
{
    let position: std::collections::HashMap<&I, usize> =
        order_ids.iter().enumerate().map(|(i, id)| (id, i)).collect();

    let mut ordered = items;
    let tail = ordered.len();
    ordered.sort_by_key(|item| {
        let id = id_fn(item);
        position.get(&id).copied().unwrap_or(tail)
    });
    ordered
}

/// True when `order_ids` contains exactly the ids in `entity_ids`, each once.
pub fn is_permutation_of<I: Eq + Hash + Clone>(order_ids: &[I], entity_ids: &[I]) -> bool {
    if order_ids.len() != entity_ids.len() {
        return false;
    }
    let ordered: HashSet<&I> = order_ids.iter().collect();
    if ordered.len() != order_ids.len() {
        return false;
    }
    entity_ids.iter().all(|id| ordered.contains(id))
}
