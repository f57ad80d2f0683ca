use proptest::prelude::*;

use memdex::domain::{Page, PageRequest};

proptest! {
    #[test]
    fn total_pages_is_the_ceiling_of_total_over_size(
        total in 0u64..10_000,
        size in 1usize..200,
        page in 0usize..500,
    ) {
        let request = PageRequest::new(page, size).unwrap();
        let result: Page<u32> = Page::new(Vec::new(), &request, total);

        prop_assert_eq!(result.total_pages(), total.div_ceil(size as u64));
    }

    #[test]
    fn has_next_iff_current_page_is_before_the_last(
        total in 0u64..10_000,
        size in 1usize..200,
        page in 0usize..500,
    ) {
        let request = PageRequest::new(page, size).unwrap();
        let result: Page<u32> = Page::new(Vec::new(), &request, total);

        let expected = (page as u64 + 1) < result.total_pages();
        prop_assert_eq!(result.has_next(), expected);
        prop_assert_eq!(result.has_prev(), page > 0);
    }

    #[test]
    fn offset_never_overlaps_previous_pages(
        size in 1usize..200,
        page in 0usize..500,
    ) {
        let request = PageRequest::new(page, size).unwrap();
        prop_assert_eq!(request.offset(), page * size);
        if page > 0 {
            let previous = PageRequest::new(page - 1, size).unwrap();
            prop_assert_eq!(previous.offset() + size, request.offset());
        }
    }
}
