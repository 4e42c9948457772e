// src/specs/fields.rs
//! Field names produced by the detail-page extractor.
//!
//! `DetailField` is a closed set; its declaration order is the column order
//! of the raw crawl file, and `header()` is the column name written there.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetailField {
    // Title block
    Name,
    Price,
    // "Basic info" label/value pairs
    DisplayedMileage,
    RegistrationTime,
    GearDisplacement,
    VehicleLocation,
    // "Archive" items
    ArchiveRegistrationTime,
    ArchiveMileage,
    Gearbox,
    EmissionStandard,
    Displacement,
    PublishTime,
    InspectionDue,
    InsuranceDue,
    WarrantyDue,
    TransferCount,
    ArchiveLocation,
    Engine,
    VehicleClass,
    BodyColor,
    FuelGrade,
    DriveType,
    // Message blob and its bracketed sub-fields
    Message,
    MsgName,
    MsgDriveType,
    MsgColor,
    MsgFactoryDate,
    MsgCompulsoryInsurance,
    MsgMileage,
    MsgDisplacement,
    MsgStatus,
    MsgKeys,
    MsgCondition,
    MsgConfiguration,
}

impl DetailField {
    pub const ALL: [DetailField; 34] = {
        use DetailField::*;
        [
            Name, Price,
            DisplayedMileage, RegistrationTime, GearDisplacement, VehicleLocation,
            ArchiveRegistrationTime, ArchiveMileage, Gearbox, EmissionStandard, Displacement,
            PublishTime, InspectionDue, InsuranceDue, WarrantyDue, TransferCount, ArchiveLocation,
            Engine, VehicleClass, BodyColor, FuelGrade, DriveType,
            Message, MsgName, MsgDriveType, MsgColor, MsgFactoryDate, MsgCompulsoryInsurance,
            MsgMileage, MsgDisplacement, MsgStatus, MsgKeys, MsgCondition, MsgConfiguration,
        ]
    };

    pub fn header(self) -> &'static str {
        use DetailField::*;
        match self {
            Name => "车辆名称",
            Price => "价格(万)",
            DisplayedMileage => "表显里程",
            RegistrationTime => "上牌时间",
            GearDisplacement => "挡位排量",
            VehicleLocation => "车辆所在地",
            ArchiveRegistrationTime => "档案_上牌时间",
            ArchiveMileage => "档案_表显里程",
            Gearbox => "变速箱",
            EmissionStandard => "排放标准",
            Displacement => "排量",
            PublishTime => "发布时间",
            InspectionDue => "年检到期",
            InsuranceDue => "保险到期",
            WarrantyDue => "质保到期",
            TransferCount => "过户次数",
            ArchiveLocation => "档案_所在地",
            Engine => "发动机",
            VehicleClass => "车辆级别",
            BodyColor => "车身颜色",
            FuelGrade => "燃油标号",
            DriveType => "驱动方式",
            Message => "留言信息",
            MsgName => "留言_车辆名称",
            MsgDriveType => "留言_驱动方式",
            MsgColor => "留言_颜色",
            MsgFactoryDate => "留言_出厂时间",
            MsgCompulsoryInsurance => "留言_交强日期",
            MsgMileage => "留言_行驶里程",
            MsgDisplacement => "留言_车辆排量",
            MsgStatus => "留言_车辆状态",
            MsgKeys => "留言_钥匙",
            MsgCondition => "留言_车况",
            MsgConfiguration => "留言_车辆配置",
        }
    }
}

/// Fields scraped from one detail page. Absent key = the rule found nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawFieldSet {
    fields: BTreeMap<DetailField, String>,
}

impl RawFieldSet {
    pub fn new() -> Self { Self::default() }

    /// Set a field unless an earlier rule already did.
    pub fn set_once(&mut self, field: DetailField, value: String) {
        self.fields.entry(field).or_insert(value);
    }

    pub fn get(&self, field: DetailField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, field: DetailField) -> bool { self.fields.contains_key(&field) }

    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// One cell per `DetailField::ALL`, empty where absent.
    pub fn to_cells(&self) -> Vec<String> {
        DetailField::ALL
            .iter()
            .map(|f| self.get(*f).map(str::to_string).unwrap_or_default())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = DetailField::ALL;
        sorted.sort();
        assert_eq!(sorted, DetailField::ALL);
    }

    #[test]
    fn headers_are_unique() {
        let mut hs: Vec<_> = DetailField::ALL.iter().map(|f| f.header()).collect();
        hs.sort();
        hs.dedup();
        assert_eq!(hs.len(), DetailField::ALL.len());
    }

    #[test]
    fn set_once_keeps_first_value() {
        let mut f = RawFieldSet::new();
        f.set_once(DetailField::Engine, s!("1.5T"));
        f.set_once(DetailField::Engine, s!("2.0T"));
        assert_eq!(f.get(DetailField::Engine), Some("1.5T"));
        let cells = f.to_cells();
        assert_eq!(cells.len(), 34);
        assert_eq!(cells[17], "1.5T");
        assert!(cells[0].is_empty());
    }
}
