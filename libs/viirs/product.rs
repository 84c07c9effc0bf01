//! VNP09GA dataset layout
//!
//! ```text
//! HDFEOS/GRIDS/VNP_Grid_1km_2D/Data Fields/SurfReflect_M1_1 .. M11_1
//! HDFEOS/GRIDS/VNP_Grid_1km_2D/Data Fields/SurfReflect_QF1_1 .. QF7_1
//! HDFEOS/GRIDS/VNP_Grid_500m_2D/Data Fields/SurfReflect_I1_1 .. I3_1
//! ```

use std::fmt;

/// Attribute holding the reflectance scale factor
pub const SCALE_ATTR: &str = "Scale";

/// Attribute holding the fill value
pub const FILL_VALUE_ATTR: &str = "_FillValue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 1200 x 1200 grid: M bands and quality flags
    Km1,
    /// 2400 x 2400 grid: I bands
    M500,
}

impl Resolution {
    pub fn grid_name(&self) -> &'static str {
        match self {
            Resolution::Km1 => "VNP_Grid_1km_2D",
            Resolution::M500 => "VNP_Grid_500m_2D",
        }
    }

    pub fn data_fields_path(&self) -> String {
        format!("HDFEOS/GRIDS/{}/Data Fields", self.grid_name())
    }

    /// How many cells of this grid span one 1 km cell, per axis
    pub fn cells_per_km(&self) -> usize {
        match self {
            Resolution::Km1 => 1,
            Resolution::M500 => 2,
        }
    }
}

/// Surface reflectance bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    M1,
    M2,
    /// Blue
    M3,
    /// Green
    M4,
    /// Red
    M5,
    /// Near infrared
    M7,
    M8,
    M10,
    M11,
    I1,
    I2,
    I3,
}

impl Band {
    pub fn label(&self) -> &'static str {
        match self {
            Band::M1 => "M1",
            Band::M2 => "M2",
            Band::M3 => "M3",
            Band::M4 => "M4",
            Band::M5 => "M5",
            Band::M7 => "M7",
            Band::M8 => "M8",
            Band::M10 => "M10",
            Band::M11 => "M11",
            Band::I1 => "I1",
            Band::I2 => "I2",
            Band::I3 => "I3",
        }
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            Band::I1 | Band::I2 | Band::I3 => Resolution::M500,
            _ => Resolution::Km1,
        }
    }

    pub fn dataset_name(&self) -> String {
        format!("SurfReflect_{}_1", self.label())
    }

    pub fn dataset_path(&self) -> String {
        format!("{}/{}", self.resolution().data_fields_path(), self.dataset_name())
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quality flag layers, all on the 1 km grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityFlag {
    QF1,
    /// Land/water and cloud shadow
    QF2,
    QF3,
    QF4,
    /// M1-M7 overall quality
    QF5,
    /// I1-I3 and M8-M11 overall quality
    QF6,
    QF7,
}

impl QualityFlag {
    pub fn number(&self) -> u8 {
        match self {
            QualityFlag::QF1 => 1,
            QualityFlag::QF2 => 2,
            QualityFlag::QF3 => 3,
            QualityFlag::QF4 => 4,
            QualityFlag::QF5 => 5,
            QualityFlag::QF6 => 6,
            QualityFlag::QF7 => 7,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::Km1
    }

    pub fn dataset_name(&self) -> String {
        format!("SurfReflect_QF{}_1", self.number())
    }

    pub fn dataset_path(&self) -> String {
        format!("{}/{}", self.resolution().data_fields_path(), self.dataset_name())
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QF{}", self.number())
    }
}
