//! Translation of REST request types into carrier-native order payloads.
//!
//! The carrier takes flat camelCase objects. Optional contact and address
//! fields are sent as empty strings rather than omitted; optional dimensions
//! are omitted rather than sent as zero.

use common::protocol::{
    CreateOrderRequest, ItemInfo, ParcelInfo, ReceiverInfo, SenderInfo, ServiceOptions,
    UpdateOrderRequest,
};
use serde_json::{json, Map, Value};

/// Service defaults the REST API does not expose.
#[derive(Debug, Clone)]
pub struct ServiceDefaults {
    pub ship_type: &'static str,
    pub transport_type: &'static str,
    pub platform_source: &'static str,
}

impl Default for ServiceDefaults {
    fn default() -> Self {
        Self {
            ship_type: "ST01",
            transport_type: "TT01",
            platform_source: "TEST22",
        }
    }
}

/// Build a full create-order payload.
pub fn create_order_payload(req: &CreateOrderRequest) -> Map<String, Value> {
    let mut order = Map::new();
    order.insert("customOrderNo".into(), json!(req.custom_order_no));
    order.insert("customerCode".into(), json!(req.customer_code));
    put_sender(&mut order, &req.sender);
    put_receiver(&mut order, &req.receiver);
    put_parcel(&mut order, &req.parcel);

    let items: Vec<Value> = req.items.iter().map(item_payload).collect();
    if !items.is_empty() {
        order.insert("itemList".into(), Value::Array(items));
    }

    let service = req.service.clone().unwrap_or_default();
    put_service(&mut order, &service, &ServiceDefaults::default());

    if !req.items.is_empty() {
        let total: u64 = req.items.iter().map(|i| u64::from(i.goods_qty)).sum();
        order.insert("goodsQTY".into(), json!(total));
    }
    order
}

/// Build a partial update-order payload containing only what the caller sent.
pub fn update_order_payload(req: &UpdateOrderRequest) -> Map<String, Value> {
    let mut order = Map::new();
    order.insert("billCode".into(), json!(req.bill_code));
    order.insert("customerCode".into(), json!(req.customer_code));

    if let Some(no) = req.custom_order_no.as_deref().filter(|s| !s.is_empty()) {
        order.insert("customOrderNo".into(), json!(no));
    }
    if let Some(s) = &req.sender {
        order.insert("sendName".into(), json!(s.name));
        order.insert("sendMobile".into(), json!(s.mobile));
        order.insert("sendAddress".into(), json!(s.address));
        order.insert("sendCountryCode".into(), json!(s.country_code));
    }
    if let Some(r) = &req.receiver {
        order.insert("acceptName".into(), json!(r.name));
        order.insert("acceptMobile".into(), json!(r.mobile));
        order.insert("acceptAddress".into(), json!(r.address));
        order.insert("acceptCountryCode".into(), json!(r.country_code));
    }
    if let Some(p) = &req.parcel {
        order.insert("parcelWeight".into(), json!(p.weight));
        if let Some(v) = p.volume.filter(|v| *v != 0.0) {
            order.insert("parcelVolume".into(), json!(v));
        }
    }
    if let Some(items) = req.items.as_ref().filter(|i| !i.is_empty()) {
        let list = items
            .iter()
            .map(|i| {
                json!({
                    "goodsName": i.goods_name,
                    "goodsQTY": i.goods_qty,
                    "goodsValue": i.goods_value,
                    "goodsWeight": i.goods_weight,
                })
            })
            .collect();
        order.insert("itemList".into(), Value::Array(list));
    }
    if let Some(service) = &req.service {
        order.insert("remark".into(), json!(text(&service.remark)));
    }
    order
}

fn text(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("")
}

fn put_sender(order: &mut Map<String, Value>, s: &SenderInfo) {
    order.insert("sendName".into(), json!(s.name));
    order.insert("sendMobile".into(), json!(s.mobile));
    order.insert("sendAddress".into(), json!(s.address));
    order.insert("sendCountryCode".into(), json!(s.country_code));
    order.insert("sendCompanyName".into(), json!(text(&s.company_name)));
    order.insert("sendPhone".into(), json!(text(&s.phone)));
    order.insert("sendMail".into(), json!(text(&s.email)));
    for key in [
        "sendProvinceCode",
        "sendProvinceName",
        "sendCityCode",
        "sendCityName",
        "sendDistrictCode",
        "sendDistrictName",
        "sendPostCode",
    ] {
        order.insert(key.into(), json!(""));
    }
}

fn put_receiver(order: &mut Map<String, Value>, r: &ReceiverInfo) {
    order.insert("acceptName".into(), json!(r.name));
    order.insert("acceptMobile".into(), json!(r.mobile));
    order.insert("acceptAddress".into(), json!(r.address));
    order.insert("acceptCountryCode".into(), json!(r.country_code));
    order.insert("acceptCompanyName".into(), json!(text(&r.company_name)));
    order.insert("acceptPhone".into(), json!(text(&r.phone)));
    order.insert("acceptEmail".into(), json!(text(&r.email)));
    for key in [
        "acceptProvinceCode",
        "acceptProvinceName",
        "acceptCityCode",
        "acceptCityName",
        "acceptDistrictCode",
        "acceptDistrictName",
        "acceptPostCode",
    ] {
        order.insert(key.into(), json!(""));
    }
}

fn put_parcel(order: &mut Map<String, Value>, p: &ParcelInfo) {
    order.insert("parcelWeight".into(), json!(p.weight));
    order.insert("piece".into(), json!(p.piece));
    if let Some(v) = p.volume {
        order.insert("parcelVolume".into(), json!(v));
    }
    if let Some(v) = p.length {
        order.insert("parcelLength".into(), json!(v));
    }
    if let Some(v) = p.width {
        order.insert("parcelWidth".into(), json!(v));
    }
    if let Some(v) = p.height {
        order.insert("parcelHigh".into(), json!(v));
    }
}

fn item_payload(i: &ItemInfo) -> Value {
    let dialect = i
        .goods_name_dialect
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(&i.goods_name);
    json!({
        "goodsName": i.goods_name,
        "goodsNameDialect": dialect,
        "goodsQTY": i.goods_qty,
        "goodsValue": i.goods_value,
        "goodsWeight": i.goods_weight,
        "goodsType": i.goods_type,
        "battery": 0,
        "blInsure": 0,
        "dutyMoney": 0,
        "goodsId": "",
        "sku": text(&i.sku),
        "goodsMaterial": "",
        "goodsRemark": "",
        "goodsRule": "",
        "goodsUnitPrice": 0,
        "makeCountry": "",
        "salePath": "",
        "unit": "",
    })
}

fn put_service(order: &mut Map<String, Value>, s: &ServiceOptions, d: &ServiceDefaults) {
    order.insert("deliveryType".into(), json!(s.delivery_type));
    order.insert("payMethod".into(), json!(s.pay_method));
    order.insert("parcelType".into(), json!(s.parcel_type));
    order.insert("shipType".into(), json!(d.ship_type));
    order.insert("transportType".into(), json!(d.transport_type));
    order.insert("platformSource".into(), json!(d.platform_source));
    order.insert("codFee".into(), json!(0));
    order.insert("insurePrice".into(), json!(0));
    order.insert("shippingFee".into(), json!(0));
    order.insert("remark".into(), json!(text(&s.remark)));
}
