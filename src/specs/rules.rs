// src/specs/rules.rs
//! Ordered label-matching rules for the detail page.
//!
//! Each rule is a predicate over an item's label text plus an extractor for
//! its value. Tables are evaluated top to bottom and the first matching rule
//! wins, so order is part of the contract: `排放标准` sits before `排量`, and
//! `排量` additionally refuses any text mentioning `排放标准`.

use super::fields::DetailField::{self, *};

#[derive(Clone, Copy, Debug)]
pub struct LabelRule {
    pub field: DetailField,
    /// At least one must occur in the text.
    pub any_of: &'static [&'static str],
    /// None may occur in the text.
    pub none_of: &'static [&'static str],
    /// Keyword cut out of the text to leave the value; `None` keeps the text whole.
    pub strip: Option<&'static str>,
}

impl LabelRule {
    const fn label(field: DetailField, any_of: &'static [&'static str]) -> Self {
        Self { field, any_of, none_of: &[], strip: None }
    }

    const fn keyword(field: DetailField, kw: &'static [&'static str]) -> Self {
        Self { field, any_of: kw, none_of: &[], strip: Some(kw[0]) }
    }

    const fn unless(mut self, none_of: &'static [&'static str]) -> Self {
        self.none_of = none_of;
        self
    }

    pub fn matches(&self, text: &str) -> bool {
        self.any_of.iter().any(|k| text.contains(k)) && !self.none_of.iter().any(|k| text.contains(k))
    }

    pub fn value(&self, text: &str) -> String {
        match self.strip {
            Some(kw) => text.replace(kw, "").trim().to_string(),
            None => text.trim().to_string(),
        }
    }
}

/// First rule in `rules` whose predicate accepts `text`.
pub fn first_match<'r>(rules: &'r [LabelRule], text: &str) -> Option<&'r LabelRule> {
    rules.iter().find(|r| r.matches(text))
}

/// Label (`<p>`) → field for the `brand-unit-item` list. The value comes from
/// the sibling `<h4>`, so nothing is stripped.
pub const BASIC_INFO: [LabelRule; 4] = [
    LabelRule::label(DisplayedMileage, &["表显里程"]),
    LabelRule::label(RegistrationTime, &["上牌时间"]),
    LabelRule::label(GearDisplacement, &["挡位", "排量"]),
    LabelRule::label(VehicleLocation, &["车辆所在地"]),
];

/// Keyword cascade for `basic-item-ul` items, whose label and value arrive as one string.
pub const ARCHIVE: [LabelRule; 16] = [
    LabelRule::keyword(ArchiveRegistrationTime, &["上牌时间"]),
    LabelRule::keyword(ArchiveMileage, &["表显里程"]),
    LabelRule::keyword(Gearbox, &["变速箱"]),
    LabelRule::keyword(EmissionStandard, &["排放标准"]),
    LabelRule::keyword(Displacement, &["排量"]).unless(&["排放标准"]),
    LabelRule::keyword(PublishTime, &["发布时间"]),
    LabelRule::keyword(InspectionDue, &["年检到期"]),
    LabelRule::keyword(InsuranceDue, &["保险到期"]),
    LabelRule::keyword(WarrantyDue, &["质保到期"]),
    LabelRule::keyword(TransferCount, &["过户次数"]),
    LabelRule::keyword(ArchiveLocation, &["所在地"]),
    LabelRule::keyword(Engine, &["发动机"]),
    LabelRule::keyword(VehicleClass, &["车辆级别"]),
    LabelRule::keyword(BodyColor, &["车身颜色"]),
    LabelRule::keyword(FuelGrade, &["燃油标号"]),
    LabelRule::keyword(DriveType, &["驱动方式"]),
];

/// Marker that runs to the end of the message blob.
pub const CONFIG_MARKER: (DetailField, &str) = (MsgConfiguration, "车辆配置");

/// `【marker】value【` pairs in the message blob; each is tried independently.
pub const MESSAGE_MARKERS: [(DetailField, &str); 10] = [
    (MsgName, "车辆名称"),
    (MsgDriveType, "驱动方式"),
    (MsgColor, "颜色"),
    (MsgFactoryDate, "出厂时间"),
    (MsgCompulsoryInsurance, "交强日期"),
    (MsgMileage, "行驶里程"),
    (MsgDisplacement, "车辆排量"),
    (MsgStatus, "车辆状态"),
    (MsgKeys, "钥匙"),
    (MsgCondition, "车况"),
];
