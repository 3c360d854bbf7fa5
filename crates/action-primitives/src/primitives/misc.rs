use std::sync::Arc;

use cdp_adapter::{CookieParam, Driver, PageId, TabInfo};

use crate::PrimitiveError;

pub async fn set_cookie(
    driver: &Arc<dyn Driver>,
    page: PageId,
    name: &str,
    value: &str,
    domain: Option<String>,
) -> Result<(), PrimitiveError> {
    driver
        .set_cookie(
            page,
            CookieParam {
                name: name.to_string(),
                value: value.to_string(),
                domain,
            },
        )
        .await
        .map_err(Into::into)
}

pub async fn new_tab(driver: &Arc<dyn Driver>, url: Option<&str>) -> Result<PageId, PrimitiveError> {
    driver.new_tab(url).await.map_err(Into::into)
}

pub async fn switch_tab(driver: &Arc<dyn Driver>, tab_id: &str) -> Result<(), PrimitiveError> {
    driver.switch_tab(tab_id).await.map_err(Into::into)
}

pub async fn close_tab(driver: &Arc<dyn Driver>, tab_id: &str) -> Result<(), PrimitiveError> {
    driver.close_tab(tab_id).await.map_err(Into::into)
}

pub async fn list_tabs(driver: &Arc<dyn Driver>) -> Result<Vec<TabInfo>, PrimitiveError> {
    driver.list_tabs().await.map_err(Into::into)
}

pub async fn execute_script(
    driver: &Arc<dyn Driver>,
    page: PageId,
    script: &str,
) -> Result<serde_json::Value, PrimitiveError> {
    driver.evaluate_script(page, script).await.map_err(Into::into)
}

pub async fn take_screenshot(driver: &Arc<dyn Driver>, page: PageId) -> Result<String, PrimitiveError> {
    driver.take_screenshot(page).await.map_err(Into::into)
}
