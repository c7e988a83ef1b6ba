// 支付API处理器
// 处理绿界结账表单请求与付款返回跳转

use actix_web::{HttpResponse, Result as ActixResult};
use chrono::Local;

use crate::handlers::page_handlers::render_report_page;
use crate::services::EcpayService;
use crate::state::AppStateData;

/// 获取绿界结账表单字段
///
/// POST /GetEcpayFormData
///
/// 响应: 含 CheckMacValue 的扁平JSON对象，前端据此组装表单提交网关
pub async fn get_ecpay_form_data(data: AppStateData) -> ActixResult<HttpResponse> {
    let ecpay = EcpayService::new(data.config.ecpay.clone());
    let form = ecpay.build_checkout_form(&data.config.public_base_url(), Local::now());

    log::info!("Checkout form built, trade no: {}", form["MerchantTradeNo"]);

    Ok(HttpResponse::Ok().json(form))
}

/// 绿界付款返回
///
/// GET|POST /EcpayReturn
///
/// 网关跳回后直接呈现报告页。当前设计不验证入站签名，
/// 无条件信任跳转 (沿用来源系统的信任策略)。
pub async fn ecpay_return() -> ActixResult<HttpResponse> {
    Ok(render_report_page())
}
