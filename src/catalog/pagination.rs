//! Page-number window for listing and search pagination controls.

use std::ops::RangeInclusive;

use serde::Serialize;

pub const DEFAULT_MAX_VISIBLE_PAGES: u64 = 5;

/// The visible run of page buttons and the boundary affordances around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationWindow {
    pub start: u64,
    pub end: u64,
    pub show_first: bool,
    pub show_last: bool,
    pub leading_gap: bool,
    pub trailing_gap: bool,
}

impl PaginationWindow {
    pub fn pages(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// One page or less: no controls at all.
    Inactive,
    Active(PaginationWindow),
}

impl PaginationState {
    pub fn window(&self) -> Option<&PaginationWindow> {
        match self {
            PaginationState::Inactive => None,
            PaginationState::Active(window) => Some(window),
        }
    }
}

/// Computes the window around `current_page`.
///
/// `current_page` must lie in `1..=total_pages`; it is not clamped. A window that
/// already left page 1 behind and stops one page short of the last page slides right
/// by one to take the last page in.
pub fn compute_window(current_page: u64, total_pages: u64, max_visible_pages: u64) -> PaginationState {
    if total_pages <= 1 {
        return PaginationState::Inactive;
    }
    let max_visible = max_visible_pages.max(1);

    let half = max_visible / 2;
    let mut start = current_page.saturating_sub(half).max(1);
    let mut end = (start + max_visible - 1).min(total_pages);
    if end - start + 1 < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    if start > 1 && total_pages - end == 1 && start < current_page {
        start += 1;
        end += 1;
    }

    PaginationState::Active(PaginationWindow {
        start,
        end,
        show_first: start > 1,
        show_last: end < total_pages,
        leading_gap: start > 2,
        trailing_gap: total_pages - end > 1,
    })
}

pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn active(current: u64, total: u64, max: u64) -> PaginationWindow {
        match compute_window(current, total, max) {
            PaginationState::Active(window) => window,
            PaginationState::Inactive => panic!("expected pagination for {current}/{total}"),
        }
    }

    #[test]
    fn single_page_is_inactive() {
        assert_eq!(compute_window(1, 1, 5), PaginationState::Inactive);
        assert_eq!(compute_window(1, 0, 5), PaginationState::Inactive);
    }

    #[test]
    fn near_the_end_includes_last_page() {
        let w = active(7, 10, 5);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![6, 7, 8, 9, 10]);
        assert!(w.show_first);
        assert!(w.leading_gap);
        assert!(!w.show_last);
        assert!(!w.trailing_gap);
    }

    #[test]
    fn first_page_window() {
        let w = active(1, 10, 5);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(!w.show_first);
        assert!(!w.leading_gap);
        assert!(w.show_last);
        assert!(w.trailing_gap);
    }

    #[test]
    fn last_page_slides_window_left() {
        let w = active(10, 10, 5);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn middle_page_has_gaps_on_both_sides() {
        let w = active(10, 20, 5);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![8, 9, 10, 11, 12]);
        assert!(w.leading_gap && w.trailing_gap);
    }

    #[test]
    fn windows_touching_page_one_stay_put() {
        for current in [2, 3] {
            let w = active(current, 6, 5);
            assert_eq!(w.pages().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5], "{current}/6");
            assert!(!w.show_first && w.show_last && !w.trailing_gap);
        }
    }

    #[test]
    fn centred_window_near_the_start() {
        let w = active(4, 10, 5);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
        assert!(w.show_first && !w.leading_gap);
        assert!(w.show_last && w.trailing_gap);
    }

    #[test]
    fn window_never_exceeds_total() {
        let w = active(2, 3, 5);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!w.show_first && !w.show_last);
    }

    #[test]
    fn window_invariants_hold_everywhere() {
        for total in 2..=30 {
            for max in 1..=9 {
                for current in 1..=total {
                    let w = active(current, total, max);
                    assert!(w.end - w.start < max, "{current}/{total}/{max}");
                    assert!(w.pages().contains(&current), "{current}/{total}/{max}");
                    assert!(w.start >= 1 && w.end <= total);
                }
            }
        }
    }

    #[test]
    fn page_count() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
    }
}
