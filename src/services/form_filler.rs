//! 表单填写服务 - 业务能力层
//!
//! 填写证件号码、两个日期控件（共六次下拉选择）并勾选条款。
//! 六次下拉选择操作的是互不重叠的 DOM 元素，因此并发执行。

use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::PageDriver;
use crate::models::{DateParts, UserQuery};
use crate::selectors;

/// 一次下拉选择的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectOutcome {
    Selected,
    OptionMissing,
    ListMissing,
}

/// 表单填写服务
pub struct FormFiller {
    wait_timeout: Duration,
}

impl FormFiller {
    pub fn new(config: &Config) -> Self {
        Self {
            wait_timeout: config.wait_timeout(),
        }
    }

    /// 填写身份页的全部字段
    ///
    /// 单个下拉选项找不到只记警告、不中断（见 DESIGN.md 的取舍记录）；
    /// 页面级的异常（元素缺失、脚本失败）会让整个填写子任务失败。
    pub async fn fill_page_details<P: PageDriver>(
        &self,
        page: &P,
        query: &UserQuery,
    ) -> AppResult<()> {
        debug!("正在填写表单...");

        page.wait_visible(selectors::ID_INPUT, self.wait_timeout)
            .await?;
        page.fill(selectors::ID_INPUT, &query.subject_id).await?;
        debug!("证件号码已填写");

        let bod = DateParts::from(query.birth_date);
        let iis = DateParts::from(query.issue_date);

        // 出生日期占每个列表的第 0 个实例，签发日期占第 1 个
        let fields = [
            (bod.day.to_string(), selectors::DAY_LISTBOX, 0),
            (bod.month.to_string(), selectors::MONTH_LISTBOX, 0),
            (bod.year.to_string(), selectors::YEAR_LISTBOX, 0),
            (iis.day.to_string(), selectors::DAY_LISTBOX, 1),
            (iis.month.to_string(), selectors::MONTH_LISTBOX, 1),
            (iis.year.to_string(), selectors::YEAR_LISTBOX, 1),
        ];

        let selections = fields
            .iter()
            .map(|(value, list_id, index)| self.select_option(page, value, list_id, *index));
        let outcomes = try_join_all(selections).await?;

        let missing = outcomes
            .iter()
            .filter(|o| **o != SelectOutcome::Selected)
            .count();
        if missing > 0 {
            warn!("⚠️ {} 个日期选项未匹配, 依赖页面默认值继续", missing);
        }
        debug!("日期字段已填写");

        self.approve_terms(page).await?;
        debug!("条款已勾选");

        Ok(())
    }

    /// 在第 index 个同 id 下拉列表中按选项文本精确选择
    async fn select_option<P: PageDriver>(
        &self,
        page: &P,
        value: &str,
        list_id: &str,
        index: usize,
    ) -> AppResult<SelectOutcome> {
        let script = build_select_script(value, list_id, index);
        let result = page.eval(&script).await?;

        let outcome = match result.as_str() {
            Some("selected") => SelectOutcome::Selected,
            Some("option-missing") => {
                warn!(
                    "⚠️ 列表 {}[{}] 中没有文本为 '{}' 的选项",
                    list_id, index, value
                );
                SelectOutcome::OptionMissing
            }
            _ => {
                warn!("⚠️ 页面上不存在第 {} 个 id 为 {} 的列表", index, list_id);
                SelectOutcome::ListMissing
            }
        };
        Ok(outcome)
    }

    /// 勾选条款确认框，元素缺失视为填写失败
    async fn approve_terms<P: PageDriver>(&self, page: &P) -> AppResult<()> {
        let result = page.eval(CHECK_TERMS_SCRIPT).await?;
        if result.as_str() != Some("checked") {
            return Err(AppError::Browser(BrowserError::ElementNotFound {
                selector: selectors::TERMS_CHECKBOX.to_string(),
            }));
        }
        Ok(())
    }
}

/// 条款勾选脚本：只在未勾选时点击
const CHECK_TERMS_SCRIPT: &str = r#"
(() => {
    const el = document.querySelector('#cbAproveTerm');
    if (!el) {
        return 'missing';
    }
    if (!el.checked) {
        el.click();
    }
    return 'checked';
})()
"#;

/// 构建下拉选择脚本
///
/// 同一个元素 id 在页面上出现两次（两个日期各一次），只能按出现
/// 顺序取第 index 个实例；选项按去除首尾空白后的文本精确匹配。
fn build_select_script(value: &str, list_id: &str, index: usize) -> String {
    format!(
        r#"
(() => {{
    const lists = document.querySelectorAll('#{list_id}');
    if (lists.length <= {index}) {{
        return 'list-missing';
    }}
    const items = lists[{index}].querySelectorAll('.k-item');
    const target = Array.from(items).find((item) => (item.textContent || '').trim() === '{value}');
    if (!target) {{
        return 'option-missing';
    }}
    target.click();
    return 'selected';
}})()
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_script_targets_occurrence() {
        let script = build_select_script("17", "uiDdlDay_listbox", 1);

        assert!(script.contains("querySelectorAll('#uiDdlDay_listbox')"));
        assert!(script.contains("lists.length <= 1"));
        assert!(script.contains("lists[1]"));
        assert!(script.contains("=== '17'"));
    }

    #[test]
    fn test_select_script_matches_trimmed_text() {
        let script = build_select_script("1987", "uiDdlYear_listbox", 0);
        assert!(script.contains(".trim() === '1987'"));
    }
}
