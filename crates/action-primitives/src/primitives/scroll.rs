use std::sync::Arc;

use cdp_adapter::{Driver, PageId};
use core_types::ScrollDirection;

use crate::PrimitiveError;

const SCROLL_STEP_PX: i32 = 500;

pub async fn scroll(
    driver: &Arc<dyn Driver>,
    page: PageId,
    direction: ScrollDirection,
    amount: Option<i32>,
) -> Result<(), PrimitiveError> {
    let px = amount.unwrap_or(SCROLL_STEP_PX);
    let dy = match direction {
        ScrollDirection::Down => px,
        ScrollDirection::Up => -px,
    };
    driver.scroll(page, 0, dy).await.map_err(Into::into)
}
