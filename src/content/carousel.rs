/// Homepage carousel ordering
///
/// The console reorders an in-memory list by drag and drop; these helpers
/// replay one such move and turn the resulting sequence into stored orders.

use crate::error::{AppError, AppResult};

/// Move the item at `from` so that it ends up at index `to`, shifting the rest.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> AppResult<()> {
    if from >= items.len() || to >= items.len() {
        return Err(AppError::Validation(format!(
            "Carousel move {} -> {} is out of range for {} items",
            from,
            to,
            items.len()
        )));
    }

    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// Pair every id with its 1-based position
pub fn assign_carousel_order<T: Clone>(ids: &[T]) -> Vec<(T, i64)> {
    ids.iter()
        .cloned()
        .zip(1_i64..)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_forward_shifts_intermediate_items_back() {
        let mut items = vec!["a", "b", "c", "d"];
        move_item(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn moving_backward_shifts_intermediate_items_forward() {
        let mut items = vec!["a", "b", "c", "d"];
        move_item(&mut items, 3, 1).unwrap();
        assert_eq!(items, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn out_of_range_moves_are_rejected() {
        let mut items = vec!["a"];
        assert!(move_item(&mut items, 0, 1).is_err());
        assert_eq!(items, vec!["a"]);
    }

    #[test]
    fn orders_are_strictly_increasing_from_one() {
        let mut ids = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        move_item(&mut ids, 2, 0).unwrap();

        let assigned = assign_carousel_order(&ids);
        let orders: Vec<i64> = assigned.iter().map(|(_, order)| *order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert!(orders.windows(2).all(|w| w[0] < w[1]));

        let visual: Vec<&str> = assigned.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(visual, vec!["z", "x", "y"]);
    }
}
