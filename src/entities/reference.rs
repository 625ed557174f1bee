//! Static reference tables of common semiconductor values

use serde::Serialize;

/// Bumped whenever table contents change
pub const REFERENCE_DATA_VERSION: u32 = 1;

/// A single looked-up value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceItem {
    pub name: &'static str,
    pub value: &'static str,
    pub unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// A titled group of items in one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceTable {
    pub title: &'static str,
    pub category: &'static str,
    pub items: &'static [ReferenceItem],
}

const fn item(
    name: &'static str,
    value: &'static str,
    unit: &'static str,
    description: &'static str,
) -> ReferenceItem {
    ReferenceItem {
        name,
        value,
        unit,
        description: Some(description),
    }
}

const fn bare(name: &'static str, value: &'static str, unit: &'static str) -> ReferenceItem {
    ReferenceItem {
        name,
        value,
        unit,
        description: None,
    }
}

pub static REFERENCE_TABLES: &[ReferenceTable] = &[
    ReferenceTable {
        title: "Common Voltage Thresholds",
        category: "Voltage",
        items: &[
            item("Logic High (5V CMOS)", "3.5", "V", "Minimum high voltage for 5V logic"),
            item("Logic Low (5V CMOS)", "0.5", "V", "Maximum low voltage for 5V logic"),
            item("Logic High (3.3V CMOS)", "2.0", "V", "Minimum high voltage for 3.3V logic"),
            item("Logic Low (3.3V CMOS)", "0.8", "V", "Maximum low voltage for 3.3V logic"),
            item("Logic High (1.8V CMOS)", "1.26", "V", "Minimum high voltage for 1.8V logic"),
            item("Logic Low (1.8V CMOS)", "0.54", "V", "Maximum low voltage for 1.8V logic"),
        ],
    },
    ReferenceTable {
        title: "Common Current Limits",
        category: "Current",
        items: &[
            item("Leakage Current (max)", "1", "μA", "Typical max static leakage"),
            item("Supply Current (typical)", "10", "mA", "Typical supply current during operation"),
            item("Output Drive Current", "20", "mA", "Typical output drive capability"),
            item("ESD Threshold", "2", "kV", "Electrostatic discharge protection level"),
        ],
    },
    ReferenceTable {
        title: "Common Frequency Standards",
        category: "Frequency",
        items: &[
            item("Crystal Oscillator", "32.768", "kHz", "Common real-time clock frequency"),
            item("Audio Sample Rate", "44.1", "kHz", "CD quality audio"),
            item("USB 2.0", "480", "Mbps", "High-speed USB standard"),
            item("DDR3 Memory", "1.6", "GHz", "Typical DDR3 clock speed"),
            item("DDR4 Memory", "2.4", "GHz", "Typical DDR4 clock speed"),
            item("PCIe 3.0", "8", "GT/s", "PCIe Gen 3 speed per lane"),
        ],
    },
    ReferenceTable {
        title: "Standard Temperature Ranges",
        category: "Temperature",
        items: &[
            item("Commercial Grade", "0 to 70", "°C", "Standard industrial devices"),
            item("Industrial Grade", "-40 to 85", "°C", "Extended temperature range"),
            item("Automotive Grade", "-40 to 125", "°C", "High temperature automotive devices"),
            item("Military Grade", "-55 to 125", "°C", "Extreme temperature range"),
        ],
    },
    ReferenceTable {
        title: "Power Consumption Classes",
        category: "Power",
        items: &[
            item("Ultra Low Power", "< 1", "mW", "Battery-powered IoT devices"),
            item("Low Power", "1 - 10", "mW", "Wearables and sensors"),
            item("Medium Power", "10 - 100", "mW", "Mobile and portable devices"),
            item("High Power", "> 100", "mW", "Server and compute chips"),
        ],
    },
    ReferenceTable {
        title: "Common Resistor Values (E12 Series)",
        category: "Resistance",
        items: &[
            bare("10Ω", "10", "Ω"),
            bare("12Ω", "12", "Ω"),
            bare("15Ω", "15", "Ω"),
            bare("18Ω", "18", "Ω"),
            bare("22Ω", "22", "Ω"),
            bare("27Ω", "27", "Ω"),
            bare("33Ω", "33", "Ω"),
            bare("39Ω", "39", "Ω"),
            bare("47Ω", "47", "Ω"),
            bare("56Ω", "56", "Ω"),
            bare("68Ω", "68", "Ω"),
            bare("82Ω", "82", "Ω"),
        ],
    },
    ReferenceTable {
        title: "Common Capacitor Values",
        category: "Capacitance",
        items: &[
            item("1pF", "1", "pF", "RF tuning capacitor"),
            item("10pF", "10", "pF", "Crystal load capacitance"),
            item("100pF", "100", "pF", "Common bypass capacitor"),
            item("1nF", "1", "nF", "Filtering and decoupling"),
            item("10nF", "10", "nF", "Standard bypass capacitor"),
            item("100nF", "100", "nF", "Most common bypass value"),
            item("1μF", "1", "μF", "General purpose filtering"),
            item("10μF", "10", "μF", "Bulk capacitance"),
        ],
    },
    ReferenceTable {
        title: "Signal Integrity Standards",
        category: "Signal Integrity",
        items: &[
            item("Setup Time", "typically", "< period/4", "Time before clock edge data must be stable"),
            item("Hold Time", "typically", "< period/4", "Time after clock edge data must remain stable"),
            item("Rise Time (3.3V)", "1 - 10", "ns", "Time to transition from low to high"),
            item("Fall Time (3.3V)", "1 - 10", "ns", "Time to transition from high to low"),
        ],
    },
];
