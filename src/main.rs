mod menu;

use anyhow::Result;

fn main() -> Result<()> {
    println!("⚡ Meter Ledger v{} - Electricity Billing Register", meter_ledger::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("All records live in memory for this session only.");

    let mut menu = menu::Menu::new();
    menu.run()
}
