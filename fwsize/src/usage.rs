use crate::config::SizeBudget;
use crate::sections::Totals;
use std::fmt;
use std::fmt::Display;

pub const KIB: u128 = 1024;

/// Used KiB, rounded up to the next whole KiB.
pub fn ceil_kib(bytes: u128) -> u128 {
    bytes.div_ceil(KIB)
}

/// Share of the budget used, in whole percent. Ties round to the even percentage.
pub fn percent_of_budget(bytes: u128, budget_kib: u64) -> u128 {
    let capacity = u128::from(budget_kib) * KIB;
    if capacity == 0 {
        return 0;
    }
    // exact rational rounding, floats would misplace the .5 ties
    let scaled = bytes.saturating_mul(100);
    let quotient = scaled / capacity;
    let twice_remainder = (scaled % capacity) * 2;
    if twice_remainder > capacity || (twice_remainder == capacity && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Usage of one memory region against its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionUsage {
    pub used_kib: u128,
    pub budget_kib: u64,
    pub percent: u128,
}

impl RegionUsage {
    pub fn new(used_bytes: u128, budget_kib: u64) -> Self {
        RegionUsage {
            used_kib: ceil_kib(used_bytes),
            budget_kib,
            percent: percent_of_budget(used_bytes, budget_kib),
        }
    }
}

impl Display for RegionUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}KiB / {}KiB ({}%)",
            self.used_kib, self.budget_kib, self.percent
        )
    }
}

/// The flash/RAM summary printed after the crate breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageReport {
    pub flash: RegionUsage,
    pub ram: RegionUsage,
}

impl UsageReport {
    pub fn new(totals: &Totals, budget: &SizeBudget) -> Self {
        UsageReport {
            flash: RegionUsage::new(totals.rom_bytes, budget.flash_kib),
            ram: RegionUsage::new(totals.ram_bytes, budget.ram_kib),
        }
    }
}

impl Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total size in release mode:")?;
        writeln!(f, "Flash: {}", self.flash)?;
        writeln!(f, "RAM: {}", self.ram)
    }
}
