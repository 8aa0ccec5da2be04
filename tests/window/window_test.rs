//! Windowing arithmetic between native pages and output pages.

use proptest::prelude::*;
use reportpage::window::{
    native_pages_in_output_page, page_index_range, total_output_pages, PageWindower,
};
use std::num::NonZeroUsize;

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn page_sizes(windower: &PageWindower) -> Vec<usize> {
    (0..windower.total_output_pages())
        .map(|i| windower.window(i).native_page_count)
        .collect()
}

#[test]
fn test_five_native_pages_in_twos() {
    let windower = PageWindower::new(5, size(2));
    assert_eq!(windower.total_output_pages(), 3);
    assert_eq!(page_sizes(&windower), vec![2, 2, 1]);
    assert_eq!(windower.window(2).native_pages(), 4..5);
}

#[test]
fn test_six_native_pages_in_threes() {
    let windower = PageWindower::new(6, size(3));
    assert_eq!(windower.total_output_pages(), 2);
    assert_eq!(page_sizes(&windower), vec![3, 3]);
    assert_eq!(windower.window(1).native_pages(), 3..6);
}

#[test]
fn test_empty_report() {
    let windower = PageWindower::new(0, size(4));
    assert_eq!(windower.total_output_pages(), 0);
    assert!(page_sizes(&windower).is_empty());
    assert_eq!(page_index_range(0, true), "0--1");
    assert_eq!(page_index_range(0, false), "");
}

#[test]
fn test_single_page_per_output_page() {
    let windower = PageWindower::new(3, size(1));
    assert_eq!(page_sizes(&windower), vec![1, 1, 1]);
    assert_eq!(page_index_range(3, true), "0-2");
}

#[test]
fn test_output_page_larger_than_report() {
    let windower = PageWindower::new(2, size(10));
    assert_eq!(windower.total_output_pages(), 1);
    assert_eq!(windower.window(0).native_pages(), 0..2);
}

proptest! {
    #[test]
    fn prop_total_output_pages_monotonic(
        a in 0usize..10_000,
        b in 0usize..10_000,
        page_size in 1usize..64,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let n = size(page_size);
        prop_assert!(total_output_pages(low, n) <= total_output_pages(high, n));
    }

    #[test]
    fn prop_windows_cover_every_native_page_once(total in 0usize..500, page_size in 1usize..40) {
        let windower = PageWindower::new(total, size(page_size));
        let covered: Vec<usize> = (0..windower.total_output_pages())
            .flat_map(|i| windower.window(i).native_pages())
            .collect();
        prop_assert_eq!(covered, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn prop_only_last_page_may_be_short(total in 1usize..500, page_size in 1usize..40) {
        let n = size(page_size);
        let pages = total_output_pages(total, n);
        for i in 0..pages.saturating_sub(1) {
            prop_assert_eq!(native_pages_in_output_page(i, pages, total, n), page_size);
        }
        let last = native_pages_in_output_page(pages - 1, pages, total, n);
        prop_assert!(last >= 1 && last <= page_size);
    }

    #[test]
    fn prop_exact_multiple_has_full_last_page(pages in 1usize..50, page_size in 1usize..20) {
        let n = size(page_size);
        let total = pages * page_size;
        prop_assert_eq!(total_output_pages(total, n), pages);
        prop_assert_eq!(native_pages_in_output_page(pages - 1, pages, total, n), page_size);
    }
}
