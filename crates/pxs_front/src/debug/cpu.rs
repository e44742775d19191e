use super::DebugApp;

use pxs_core::cpu::{Opcode, REGISTER_NAMES};
use pxs_core::System;

/// Shows the values of all the CPU registers.
#[derive(Default)]
pub struct CpuStatus {
    /// Show registers as signed decimal instead of hex.
    decimal: bool,
}

impl CpuStatus {
    fn format(&self, val: u32) -> String {
        if self.decimal {
            format!("{}", val as i32)
        } else {
            format!("{val:08x}")
        }
    }
}

impl DebugApp for CpuStatus {
    fn name(&self) -> &str {
        "Registers"
    }

    fn show(&mut self, system: &mut System, ui: &mut egui::Ui) {
        let cpu = &system.cpu;

        ui.checkbox(&mut self.decimal, "Decimal");
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.collapsing("Status", |ui| {
                    egui::Grid::new("cpu_status_grid").show(ui, |ui| {
                        ui.label("pc");
                        ui.label(format!("{:08x}", cpu.pc));
                        ui.end_row();

                        ui.label("ins");
                        match system.mem.read_u32(cpu.pc) {
                            Some(op) => ui.label(Opcode::new(op).at(cpu.pc).to_string()),
                            None => ui.label("???"),
                        };
                        ui.end_row();

                        ui.label("hi");
                        ui.label(self.format(cpu.hi));
                        ui.end_row();

                        ui.label("lo");
                        ui.label(self.format(cpu.lo));
                        ui.end_row();
                    });
                });
                ui.collapsing("Registers", |ui| {
                    egui::Grid::new("cpu_register_grid").striped(true).show(ui, |ui| {
                        // Two registers on each row.
                        for (row, names) in REGISTER_NAMES.chunks(2).enumerate() {
                            for (col, name) in names.iter().enumerate() {
                                ui.label(*name);
                                ui.label(self.format(cpu.registers[row * 2 + col]));
                            }
                            ui.end_row();
                        }
                    });
                });
                ui.collapsing("COP0", |ui| {
                    egui::Grid::new("cpu_cop0_grid").show(ui, |ui| {
                        let fields = [
                            ("status", cpu.cop0.status),
                            ("cause", cpu.cop0.cause),
                            ("epc", cpu.cop0.epc),
                            ("badvaddr", cpu.cop0.badvaddr),
                        ];
                        for (name, val) in fields {
                            ui.label(name);
                            ui.label(format!("{val:08x}"));
                            ui.end_row();
                        }
                    });
                });
            });
    }

    fn show_window(&mut self, system: &mut System, ctx: &egui::Context, open: &mut bool) {
        egui::Window::new(self.name())
            .open(open)
            .resizable(true)
            .min_width(120.0)
            .default_width(300.0)
            .default_height(400.0)
            .show(ctx, |ui| self.show(system, ui));
    }
}

#[test]
fn register_formatting() {
    let mut status = CpuStatus::default();
    assert_eq!(status.format(0xffff_fffe), "fffffffe");
    status.decimal = true;
    assert_eq!(status.format(0xffff_fffe), "-2");
}
