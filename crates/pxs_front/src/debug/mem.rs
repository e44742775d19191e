//! Hex editor for a single memory region.

use super::DebugApp;

use pxs_core::{Memory, Region, System};

const ROWS: usize = 16;
const COLUMNS: usize = 16;
const HEX_ASCII: &[u8] = "0123456789abcdef".as_bytes();

/// Parse a hex address, with or without a '0x' prefix.
pub fn parse_addr(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    u32::from_str_radix(digits, 16).map_err(|err| format!("Invalid address: {err}"))
}

fn hex_byte(val: u8) -> String {
    let chars = [HEX_ASCII[(val >> 4) as usize], HEX_ASCII[(val & 0xf) as usize]];
    String::from_utf8_lossy(&chars).into_owned()
}

fn ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| if b.is_ascii_graphic() { *b as char } else { '.' })
        .collect()
}

pub struct MemEditor {
    region: Region,
    title: String,
    /// Offset into the region of the first row.
    start: usize,
    addr_input: String,
    /// Error message if 'addr_input' is invalid.
    addr_msg: Option<String>,
    /// Offset of the byte being edited.
    selected: Option<usize>,
    value_input: String,
}

impl MemEditor {
    /// Main RAM has several editors, which are told apart by 'idx'.
    pub fn new(region: Region, idx: usize) -> Self {
        let title = match region {
            Region::Main => format!("Memory Editor #{}", idx + 1),
            _ => region.to_string(),
        };
        Self {
            region,
            title,
            start: 0,
            addr_input: String::new(),
            addr_msg: None,
            selected: None,
            value_input: String::new(),
        }
    }

    /// Offset into the region of 'addr', which may either be a virtual address or an offset.
    fn locate(&self, addr: u32) -> Option<usize> {
        match Memory::resolve(addr) {
            Some((region, offset)) if region == self.region => Some(offset),
            _ if (addr as usize) < self.region.size() => Some(addr as usize),
            _ => None,
        }
    }

    fn goto(&mut self) {
        self.addr_msg = match parse_addr(&self.addr_input) {
            Err(err) => Some(err),
            Ok(addr) => match self.locate(addr) {
                Some(offset) => {
                    self.start = offset & !(COLUMNS - 1);
                    self.clamp_start();
                    None
                }
                None => Some(format!("{addr:08x} is outside of {}", self.region)),
            },
        };
    }

    fn clamp_start(&mut self) {
        let last = self.region.size().saturating_sub(ROWS * COLUMNS);
        self.start = self.start.min(last);
    }

    fn scroll(&mut self, rows: isize) {
        let delta = rows * COLUMNS as isize;
        self.start = (self.start as isize + delta).max(0) as usize;
        self.clamp_start();
    }

    /// Write 'value_input' to the selected byte.
    fn write(&mut self, mem: &mut Memory) {
        let Some(offset) = self.selected else {
            return;
        };
        match u8::from_str_radix(self.value_input.trim(), 16) {
            Ok(val) => {
                mem.region_mut(self.region)[offset] = val;
                self.selected = None;
                self.value_input.clear();
            }
            Err(err) => self.addr_msg = Some(format!("Invalid value: {err}")),
        }
    }
}

impl DebugApp for MemEditor {
    fn name(&self) -> &str {
        &self.title
    }

    fn show(&mut self, system: &mut System, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_sized([120.0, 20.0], egui::TextEdit::singleline(&mut self.addr_input));

            if ui.button("Goto").clicked() {
                self.goto();
            }
            if ui.button("⬆").clicked() {
                self.scroll(-1);
            }
            if ui.button("⬇").clicked() {
                self.scroll(1);
            }
            if ui.button("⏶").clicked() {
                self.scroll(-(ROWS as isize));
            }
            if ui.button("⏷").clicked() {
                self.scroll(ROWS as isize);
            }
            if let Some(msg) = &self.addr_msg {
                ui.label(msg);
            }
        });

        ui.separator();

        let base = self.region.base();
        let data = system.mem.region(self.region);

        egui::Grid::new(self.title.as_str())
            .spacing([4.0, 2.0])
            .show(ui, |ui| {
                for row in 0..ROWS {
                    let offset = self.start + row * COLUMNS;
                    let Some(bytes) = data.get(offset..offset + COLUMNS) else {
                        break;
                    };

                    ui.monospace(format!("{:08x}", base as usize + offset));

                    for (col, byte) in bytes.iter().enumerate() {
                        let selected = self.selected == Some(offset + col);
                        let text = egui::RichText::new(hex_byte(*byte)).monospace();
                        if ui.selectable_label(selected, text).clicked() {
                            self.selected = Some(offset + col);
                            self.value_input = hex_byte(*byte);
                        }
                    }

                    ui.monospace(ascii(bytes));
                    ui.end_row();
                }
            });

        if let Some(offset) = self.selected {
            ui.separator();
            ui.horizontal(|ui| {
                ui.label(format!("{:08x}", base as usize + offset));
                ui.add_sized([40.0, 20.0], egui::TextEdit::singleline(&mut self.value_input));
                if ui.button("Write").clicked() {
                    self.write(&mut system.mem);
                }
                if ui.button("Cancel").clicked() {
                    self.selected = None;
                }
            });
        }
    }

    fn show_window(&mut self, system: &mut System, ctx: &egui::Context, open: &mut bool) {
        egui::Window::new(self.name())
            .open(open)
            .resizable(true)
            .min_width(120.0)
            .show(ctx, |ui| self.show(system, ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parsing() {
        assert_eq!(parse_addr("bfc00000"), Ok(0xbfc0_0000));
        assert_eq!(parse_addr(" 0x80010000 "), Ok(0x8001_0000));
        assert!(parse_addr("hello").is_err());
    }

    #[test]
    fn formatting() {
        assert_eq!(hex_byte(0x0a), "0a");
        assert_eq!(hex_byte(0xff), "ff");
        assert_eq!(ascii(b"PS-X\0\x7f"), "PS-X..");
    }

    #[test]
    fn titles() {
        assert_eq!(MemEditor::new(Region::Main, 2).name(), "Memory Editor #3");
        assert_eq!(MemEditor::new(Region::ScratchPad, 9).name(), "Scratch Pad");
    }

    #[test]
    fn goto_virtual_and_offset() {
        let mut editor = MemEditor::new(Region::Bios, 11);

        editor.addr_input = "bfc00123".to_string();
        editor.goto();
        assert_eq!(editor.start, 0x120);
        assert!(editor.addr_msg.is_none());

        editor.addr_input = "40".to_string();
        editor.goto();
        assert_eq!(editor.start, 0x40);

        editor.addr_input = "80010000".to_string();
        editor.goto();
        assert!(editor.addr_msg.is_some());
        assert_eq!(editor.start, 0x40);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut editor = MemEditor::new(Region::ScratchPad, 9);
        editor.scroll(-3);
        assert_eq!(editor.start, 0);
        editor.scroll(1000);
        assert_eq!(editor.start, Region::ScratchPad.size() - ROWS * COLUMNS);
    }

    #[test]
    fn write_selected_byte() {
        let mut mem = Memory::default();
        let mut editor = MemEditor::new(Region::Main, 0);
        editor.selected = Some(0x10);
        editor.value_input = "zz".to_string();
        editor.write(&mut mem);
        assert_eq!(mem.region(Region::Main)[0x10], 0);
        assert!(editor.addr_msg.is_some());

        editor.value_input = "a5".to_string();
        editor.write(&mut mem);
        assert_eq!(mem.region(Region::Main)[0x10], 0xa5);
        assert!(editor.selected.is_none());
    }
}
