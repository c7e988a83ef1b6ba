// 绿界结账服务
// 组装结账字段集合并附加 CheckMacValue 签名

use chrono::{DateTime, Local};
use std::collections::HashMap;

use crate::config::EcpayConfig;
use crate::models::CheckoutOrder;
use crate::utils::generate_check_mac_value;

/// 绿界结账服务
pub struct EcpayService {
    config: EcpayConfig,
}

impl EcpayService {
    /// 创建新的结账服务实例
    pub fn new(config: EcpayConfig) -> Self {
        Self { config }
    }

    /// 构建带签名的结账表单字段
    ///
    /// 交易编号与交易时间取自 `now`；回调与返回地址基于对外公开网址。
    /// 返回的映射可直接序列化为JSON供前端表单提交至网关。
    ///
    /// # Arguments
    /// * `base_url` - 对外公开的基础网址 (不含结尾斜杠)
    /// * `now` - 当前本地时间
    ///
    /// # Returns
    /// * 含 CheckMacValue 的完整字段映射
    pub fn build_checkout_form(
        &self,
        base_url: &str,
        now: DateTime<Local>,
    ) -> HashMap<String, String> {
        let order = CheckoutOrder {
            merchant_id: self.config.merchant_id.clone(),
            merchant_trade_no: format!("DOC{}", now.format("%Y%m%d%H%M%S")),
            merchant_trade_date: now.format("%Y/%m/%d %H:%M:%S").to_string(),
            payment_type: "aio".to_string(),
            total_amount: self.config.total_amount.clone(),
            trade_desc: self.config.trade_desc.clone(),
            item_name: self.config.item_name.clone(),
            return_url: format!("{}/EcpayReturn", base_url),
            choose_payment: self.config.choose_payment.clone(),
            encrypt_type: "1".to_string(),
            client_back_url: format!("{}/Report", base_url),
            order_result_url: format!("{}/EcpayReturn", base_url),
            need_extra_paid_info: "N".to_string(),
        };

        let mut fields = order.into_field_map();
        let mac = generate_check_mac_value(&fields, &self.config.hash_key, &self.config.hash_iv);
        fields.insert("CheckMacValue".to_string(), mac);
        fields
    }
}
