//! Disassembly around the program counter or any other address.

use super::mem::parse_addr;
use super::DebugApp;

use pxs_core::cpu::Opcode;
use pxs_core::System;

const ROWS: u32 = 24;

/// Instructions shown above the PC when following it.
const CONTEXT: u32 = 8;

pub struct AssemblyView {
    /// Keep the PC in view.
    follow_pc: bool,
    /// The first address shown if not following the PC.
    start_addr: u32,
    addr_input: String,
    addr_msg: Option<String>,
}

impl Default for AssemblyView {
    fn default() -> Self {
        Self {
            follow_pc: true,
            start_addr: 0,
            addr_input: String::new(),
            addr_msg: None,
        }
    }
}

impl AssemblyView {
    /// The first address shown. Always word aligned.
    fn first_addr(&self, pc: u32) -> u32 {
        let addr = if self.follow_pc {
            pc.wrapping_sub(CONTEXT * 4)
        } else {
            self.start_addr
        };
        addr & !3
    }
}

impl DebugApp for AssemblyView {
    fn name(&self) -> &str {
        "Assembly"
    }

    fn show(&mut self, system: &mut System, ui: &mut egui::Ui) {
        let pc = system.cpu.pc;

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.follow_pc, "Follow PC");
            ui.add_sized([120.0, 20.0], egui::TextEdit::singleline(&mut self.addr_input));
            if ui.button("Goto").clicked() {
                self.addr_msg = match parse_addr(&self.addr_input) {
                    Ok(addr) => {
                        self.start_addr = addr;
                        self.follow_pc = false;
                        None
                    }
                    Err(err) => Some(err),
                };
            }
            if ui.button("⬆").clicked() {
                self.start_addr = self.first_addr(pc).wrapping_sub(4);
                self.follow_pc = false;
            }
            if ui.button("⬇").clicked() {
                self.start_addr = self.first_addr(pc).wrapping_add(4);
                self.follow_pc = false;
            }
            if let Some(msg) = &self.addr_msg {
                ui.label(msg);
            }
        });

        ui.separator();

        let start = self.first_addr(pc);

        egui::Grid::new("assembly_grid")
            .spacing([12.0, 2.0])
            .show(ui, |ui| {
                for row in 0..ROWS {
                    let addr = start.wrapping_add(row * 4);
                    let text = match system.mem.read_u32(addr) {
                        Some(op) => format!("{:08x}  {}", op, Opcode::new(op).at(addr)),
                        None => "???".to_string(),
                    };
                    let addr = format!("{addr:08x}");
                    if start.wrapping_add(row * 4) == pc {
                        ui.colored_label(crate::gui::ACCENT, egui::RichText::new(addr).monospace());
                        ui.colored_label(crate::gui::ACCENT, egui::RichText::new(text).monospace());
                    } else {
                        ui.monospace(addr);
                        ui.monospace(text);
                    }
                    ui.end_row();
                }
            });
    }

    fn show_window(&mut self, system: &mut System, ctx: &egui::Context, open: &mut bool) {
        egui::Window::new(self.name())
            .open(open)
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.show(system, ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_pc() {
        let view = AssemblyView::default();
        assert_eq!(view.first_addr(0xbfc0_0100), 0xbfc0_00e0);
    }

    #[test]
    fn fixed_start_is_aligned() {
        let view = AssemblyView {
            follow_pc: false,
            start_addr: 0x8001_0003,
            ..Default::default()
        };
        assert_eq!(view.first_addr(0xbfc0_0100), 0x8001_0000);
    }
}
