//! Parsing of `cargo size -A` output into flash and RAM totals.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// .name   <size>   0x<addr>, only sections loaded at a non-zero address count.
static SECTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\.([a-zA-Z._]*)\s*([0-9]+)\s*0x[1-9a-f][0-9a-f]*$")
        .expect("section line pattern is a constant")
});

/// Where a section ends up on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    Flash,
    Ram,
}

impl MemoryRegion {
    /// Only `.bss` and `.data` are counted against RAM. Everything else, `.text`, `.rodata`
    /// and vendor specific sections alike, is counted against flash.
    pub fn classify(section_name: &str) -> Self {
        match section_name {
            "bss" | "data" => MemoryRegion::Ram,
            _ => MemoryRegion::Flash,
        }
    }
}

/// One matched line of the section size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRecord<'a> {
    /// Section name without its leading dot.
    pub name: &'a str,
    pub bytes: u128,
}

impl<'a> SectionRecord<'a> {
    /// Returns None for anything that is not a section line with a non-zero address.
    pub fn parse(line: &'a str) -> Option<Self> {
        let captures = SECTION_LINE.captures(line)?;
        let name = captures.get(1)?.as_str();
        // ascii digits only, so the parse can only fail by overflowing
        let bytes = captures.get(2)?.as_str().parse().unwrap_or(u128::MAX);
        Some(SectionRecord { name, bytes })
    }

    pub fn region(&self) -> MemoryRegion {
        MemoryRegion::classify(self.name)
    }
}

/// Running flash and RAM byte counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub ram_bytes: u128,
    pub rom_bytes: u128,
}

impl Totals {
    pub fn absorb(&mut self, record: &SectionRecord) {
        match record.region() {
            MemoryRegion::Ram => self.ram_bytes = self.ram_bytes.saturating_add(record.bytes),
            MemoryRegion::Flash => self.rom_bytes = self.rom_bytes.saturating_add(record.bytes),
        }
    }

    /// Sums every section line of a `cargo size -A` listing, other lines are skipped.
    pub fn from_listing(listing: &str) -> Self {
        let mut totals = Totals::default();
        for line in listing.lines() {
            match SectionRecord::parse(line) {
                Some(record) => {
                    debug!(
                        "section .{} {} bytes -> {:?}",
                        record.name,
                        record.bytes,
                        record.region()
                    );
                    totals.absorb(&record);
                }
                None => debug!("skipped: {:?}", line),
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
firmware  :
section               size        addr
.vector_table          392   0x8000000
.text                59220   0x8000188
.rodata               9856   0x800e8e0
.data                   56  0x20000000
.gnu.sgstubs             0   0x8011000
.bss                 10436  0x20000038
.uninit                  0  0x20002900
.defmt                   7         0x0
.debug_abbrev         7430         0x0
.comment               153         0x0
Total               230012
";

    #[test]
    fn test_bss_counts_as_ram() {
        let mut totals = Totals::default();
        totals.absorb(&SectionRecord::parse(".bss 100 0x20000000").unwrap());
        assert_eq!(totals, Totals { ram_bytes: 100, rom_bytes: 0 });
    }

    #[test]
    fn test_data_counts_as_ram() {
        let mut totals = Totals::default();
        totals.absorb(&SectionRecord::parse(".data    100   0xa0000000").unwrap());
        assert_eq!(totals, Totals { ram_bytes: 100, rom_bytes: 0 });
    }

    #[test]
    fn test_text_counts_as_flash() {
        let mut totals = Totals::default();
        totals.absorb(&SectionRecord::parse(".text 2048 0x8000188").unwrap());
        assert_eq!(totals, Totals { ram_bytes: 0, rom_bytes: 2048 });
    }

    #[test]
    fn test_zero_leading_address_is_ignored() {
        assert_eq!(SectionRecord::parse(".bss 100 0x0"), None);
        assert_eq!(SectionRecord::parse(".text 2048 0x08000000"), None);
        assert_eq!(Totals::from_listing(".text 2048 0x08000000\n"), Totals::default());
    }

    #[test]
    fn test_non_section_lines_are_ignored() {
        assert_eq!(SectionRecord::parse("section               size        addr"), None);
        assert_eq!(SectionRecord::parse("Total               230012"), None);
        assert_eq!(SectionRecord::parse(""), None);
        // uppercase hex is not what the tool prints
        assert_eq!(SectionRecord::parse(".text 2048 0x800ABCD"), None);
    }

    #[test]
    fn test_only_ascii_digits_are_sizes() {
        assert_eq!(SectionRecord::parse(".text \u{661}\u{662} 0x8000000"), None);
    }

    #[test]
    fn test_sizes_beyond_u64_are_counted() {
        let totals = Totals::from_listing(
            ".text 18446744073709551615 0x8000000\n.text 1 0x8000000\n.bss 18446744073709551616 0x20000000\n",
        );
        assert_eq!(totals.rom_bytes, u128::from(u64::MAX) + 1);
        assert_eq!(totals.ram_bytes, u128::from(u64::MAX) + 1);
    }

    #[test]
    fn test_totals_saturate() {
        let totals = Totals::from_listing(
            ".text 340282366920938463463374607431768211455 0x8000000\n\
             .text 10 0x8000000\n\
             .rodata 999999999999999999999999999999999999999999 0x8000000\n",
        );
        assert_eq!(totals.rom_bytes, u128::MAX);
        assert_eq!(totals.ram_bytes, 0);
    }

    #[test]
    fn test_dotted_section_names() {
        let record = SectionRecord::parse(".gnu.sgstubs 12 0x8011000").unwrap();
        assert_eq!(record.name, "gnu.sgstubs");
        assert_eq!(record.region(), MemoryRegion::Flash);
    }

    #[test]
    fn test_only_exact_names_are_ram() {
        assert_eq!(MemoryRegion::classify("bss"), MemoryRegion::Ram);
        assert_eq!(MemoryRegion::classify("data"), MemoryRegion::Ram);
        assert_eq!(MemoryRegion::classify("tdata"), MemoryRegion::Flash);
        assert_eq!(MemoryRegion::classify("data.rel"), MemoryRegion::Flash);
        assert_eq!(MemoryRegion::classify("uninit"), MemoryRegion::Flash);
    }

    #[test]
    fn test_full_listing() {
        let totals = Totals::from_listing(LISTING);
        assert_eq!(totals.ram_bytes, 56 + 10436);
        assert_eq!(totals.rom_bytes, 392 + 59220 + 9856);
    }
}
