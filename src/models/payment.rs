// 支付结账数据模型
// 定义提交给绿界网关的结账订单结构

use std::collections::HashMap;

/// 结账订单
///
/// 边界上使用具名字段的结构化记录；仅在进入签名器时
/// 退化为顺序无关的字段映射 (网关的实际契约)。
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    /// 商店代号
    pub merchant_id: String,
    /// 商店交易编号 (DOC + 时间戳，每次结账唯一)
    pub merchant_trade_no: String,
    /// 商店交易时间 (yyyy/MM/dd HH:mm:ss)
    pub merchant_trade_date: String,
    /// 交易类型，绿界固定为 aio
    pub payment_type: String,
    /// 交易金额 (整数字符串)
    pub total_amount: String,
    /// 交易描述
    pub trade_desc: String,
    /// 商品名称
    pub item_name: String,
    /// 服务器端回调地址
    pub return_url: String,
    /// 付款方式
    pub choose_payment: String,
    /// 签名类型，1 = SHA-256
    pub encrypt_type: String,
    /// 消费者返回按钮地址
    pub client_back_url: String,
    /// 付款结果通知地址
    pub order_result_url: String,
    /// 是否需要额外付款资讯
    pub need_extra_paid_info: String,
}

impl CheckoutOrder {
    /// 转换为网关字段映射 (键为网关约定的 PascalCase 字段名)
    pub fn into_field_map(self) -> HashMap<String, String> {
        HashMap::from([
            ("MerchantID".to_string(), self.merchant_id),
            ("MerchantTradeNo".to_string(), self.merchant_trade_no),
            ("MerchantTradeDate".to_string(), self.merchant_trade_date),
            ("PaymentType".to_string(), self.payment_type),
            ("TotalAmount".to_string(), self.total_amount),
            ("TradeDesc".to_string(), self.trade_desc),
            ("ItemName".to_string(), self.item_name),
            ("ReturnURL".to_string(), self.return_url),
            ("ChoosePayment".to_string(), self.choose_payment),
            ("EncryptType".to_string(), self.encrypt_type),
            ("ClientBackURL".to_string(), self.client_back_url),
            ("OrderResultURL".to_string(), self.order_result_url),
            ("NeedExtraPaidInfo".to_string(), self.need_extra_paid_info),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_field_map_keys() {
        let order = CheckoutOrder {
            merchant_id: "2000132".to_string(),
            merchant_trade_no: "DOC20250101000000".to_string(),
            merchant_trade_date: "2025/01/01 00:00:00".to_string(),
            payment_type: "aio".to_string(),
            total_amount: "2990".to_string(),
            trade_desc: "Doc Engine Report".to_string(),
            item_name: "Risk Assessment Report".to_string(),
            return_url: "http://localhost:5163/EcpayReturn".to_string(),
            choose_payment: "Credit".to_string(),
            encrypt_type: "1".to_string(),
            client_back_url: "http://localhost:5163/Report".to_string(),
            order_result_url: "http://localhost:5163/EcpayReturn".to_string(),
            need_extra_paid_info: "N".to_string(),
        };

        let map = order.into_field_map();
        assert_eq!(map.len(), 13);
        assert_eq!(map["MerchantID"], "2000132");
        assert_eq!(map["EncryptType"], "1");
        assert!(!map.contains_key("CheckMacValue"));
    }
}
