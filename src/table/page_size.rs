//! Page size choices offered under each table

use crate::api::DEFAULT_PAGE_SIZE;

/// Page sizes in the order they are offered
pub const PAGE_SIZE_STEPS: [u32; 4] = [25, 50, 100, 200];

/// Page sizes worth offering for `total` rows.
///
/// A size is offered while every smaller size would still leave rows on a
/// later page, so the last option is the first size that fits everything.
/// No rows means no options; call sites use
/// [`page_size_options_or_default`] to fall back to `[25]`.
pub fn compute_page_size_options(total: u64) -> Vec<u32> {
    let mut options = Vec::new();
    let mut previous = 0u64;
    for size in PAGE_SIZE_STEPS {
        if previous >= total {
            break;
        }
        options.push(size);
        previous = size as u64;
    }
    options
}

/// [`compute_page_size_options`] with the `[25]` fallback for empty tables
pub fn page_size_options_or_default(total: u64) -> Vec<u32> {
    let options = compute_page_size_options(total);
    if options.is_empty() {
        vec![DEFAULT_PAGE_SIZE]
    } else {
        options
    }
}

/// Number of pages needed for `total` rows at `page_size`
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64) as u32
}
