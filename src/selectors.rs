//! 目标页面的固定选择器契约
//!
//! 本系统只针对一个固定的外部页面流程，字段与选择器是稳定契约，
//! 集中在这里维护。日期下拉列表的元素 id 在页面上出现两次
//! （出生日期一次、签发日期一次），靠出现顺序区分，因此以裸 id
//! 的形式保存，由填表脚本自行拼接 `querySelectorAll`。

/// 证件号码输入框
pub const ID_INPUT: &str = "#txtId";

/// 日期下拉列表（裸 id，页面上出现两次）
pub const DAY_LISTBOX: &str = "uiDdlDay_listbox";
pub const MONTH_LISTBOX: &str = "uiDdlMonth_listbox";
pub const YEAR_LISTBOX: &str = "uiDdlYear_listbox";

/// 条款确认复选框
pub const TERMS_CHECKBOX: &str = "#cbAproveTerm";

/// 验证码图片
pub const CAPTCHA_IMAGE: &str = "#LocateBeneficiariesCaptcha_CaptchaImage";

/// 验证码答案输入框
pub const CAPTCHA_INPUT: &str = "#CaptchaCode";

/// 表单提交按钮
pub const SUBMIT_BUTTON: &str = "#butIdent";

/// 结果页标志元素（同时也是触发导出链接渲染的按钮）
pub const RESULTS_MARKER: &str = "#butInsuranceOf";

/// 导出链接就绪标志
pub const EXPORT_READY_MARKER: &str = "#butAllInsurance";

/// 导出链接锚点的 title 属性值
pub const EXPORT_LINK_TITLE: &str = "פוליסות";
