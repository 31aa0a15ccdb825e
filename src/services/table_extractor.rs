//! 表格提取服务 - 业务能力层
//!
//! 结果页上有一个带固定 title 属性的导出锚点，把它的 href 解析成
//! 绝对地址后打开，再把第一个表格主体逐行读成单元格文本。
//! 给定同一份渲染文档，提取是纯读取、可重复执行的。

use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, AppResult, ExtractionError};
use crate::infrastructure::PageDriver;
use crate::models::TableRows;
use crate::selectors;

/// 表格提取服务
pub struct TableExtractor {
    portal_base_url: String,
    wait_timeout: Duration,
}

impl TableExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            portal_base_url: config.portal_base_url.clone(),
            wait_timeout: config.wait_timeout(),
        }
    }

    /// 从结果页提取导出文档的表格
    ///
    /// 区分三种结局：锚点缺失、文档中没有表格（都是错误），
    /// 以及表格存在但零行（合法的空结果）。
    pub async fn extract<P: PageDriver>(&self, page: &P) -> AppResult<TableRows> {
        debug!("正在定位导出链接...");
        page.wait_visible(selectors::EXPORT_READY_MARKER, self.wait_timeout)
            .await?;

        // 导出文档打开时会触发打印对话框，先把 window.print 替换掉
        page.eval(PRINT_GUARD_SCRIPT).await?;

        let href_value = page.eval(&export_link_script()).await?;
        let href = match href_value.as_str() {
            Some(href) if !href.is_empty() => href.to_string(),
            _ => return Err(AppError::Extraction(ExtractionError::ExportLinkNotFound)),
        };

        let document_url = Url::parse(&self.portal_base_url)
            .and_then(|base| base.join(&href))
            .map_err(|e| {
                AppError::Extraction(ExtractionError::InvalidExportHref {
                    href: href.clone(),
                    source: Box::new(e),
                })
            })?;

        info!("📄 正在打开导出文档: {}", document_url);
        page.navigate(document_url.as_str()).await?;

        let html = page.content().await?;
        debug!("导出文档已渲染, HTML 长度: {}", html.len());

        let rows_value = page.eval(ROWS_SCRIPT).await?;
        if rows_value.is_null() {
            return Err(AppError::Extraction(ExtractionError::TableNotFound));
        }
        let rows: TableRows = serde_json::from_value(rows_value).map_err(|e| {
            AppError::Extraction(ExtractionError::MalformedRows {
                detail: e.to_string(),
            })
        })?;

        info!("✓ 表格提取完成, 共 {} 行", rows.len());
        Ok(rows)
    }
}

/// 屏蔽导出文档的打印对话框
const PRINT_GUARD_SCRIPT: &str = r#"
(() => {
    window.print = () => {};
    return true;
})()
"#;

/// 读取第一个表格主体的全部行，单元格文本去除首尾空白。
/// 没有表格主体时返回 null，与"有表格但零行"区分开。
const ROWS_SCRIPT: &str = r#"
(() => {
    const body = document.querySelector('table tbody');
    if (!body) {
        return null;
    }
    const rows = Array.from(body.querySelectorAll('tr'));
    return rows.map((row) =>
        Array.from(row.querySelectorAll('td, th')).map((cell) =>
            (cell.innerText || cell.textContent || '').trim()
        )
    );
})()
"#;

/// 构建导出链接定位脚本
fn export_link_script() -> String {
    format!(
        r#"
(() => {{
    const link = document.querySelector('a[title="{}"]');
    if (!link) {{
        return null;
    }}
    return link.getAttribute('href');
}})()
"#,
        selectors::EXPORT_LINK_TITLE
    )
}
