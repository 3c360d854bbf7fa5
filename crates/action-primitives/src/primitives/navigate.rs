use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{Driver, DriverOutcome, PageId};

use crate::PrimitiveError;

pub async fn navigate(
    driver: &Arc<dyn Driver>,
    page: PageId,
    url: &str,
    timeout: Duration,
) -> Result<DriverOutcome, PrimitiveError> {
    driver.navigate(page, url, timeout).await.map_err(Into::into)
}

pub async fn go_back(driver: &Arc<dyn Driver>, page: PageId) -> Result<(), PrimitiveError> {
    driver.go_back(page).await.map_err(Into::into)
}

pub async fn go_forward(driver: &Arc<dyn Driver>, page: PageId) -> Result<(), PrimitiveError> {
    driver.go_forward(page).await.map_err(Into::into)
}

pub async fn refresh(driver: &Arc<dyn Driver>, page: PageId) -> Result<(), PrimitiveError> {
    driver.refresh(page).await.map_err(Into::into)
}
