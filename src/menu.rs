// Interactive console menu over the ledger
//
// Line-oriented prompt loop: register consumers, list them, enter bills,
// and print a bill report with up to three previous bills. Invalid fields
// re-prompt until they validate.

use anyhow::{bail, Result};
use chrono::Utc;
use meter_ledger::{
    is_valid_address, is_valid_mobile, is_valid_month, is_valid_name, is_valid_year,
    BillEntryError, BillingService, BillStore, Consumer, ConsumerStore, ReportError,
};
use std::io::{self, BufRead, Write};

pub struct Menu {
    consumers: ConsumerStore,
    bills: BillStore,
    service: BillingService,
}

impl Menu {
    pub fn new() -> Self {
        Menu {
            consumers: ConsumerStore::new(),
            bills: BillStore::new(),
            service: BillingService::new(),
        }
    }

    /// Run the menu loop until the operator exits
    pub fn run(&mut self) -> Result<()> {
        loop {
            println!("\nMenu:");
            println!("1. Add Consumer");
            println!("2. Display all Consumers");
            println!("3. Add Bill");
            println!("4. Generate Bill for a Consumer");
            println!("5. Exit");

            let choice = prompt_u32("Enter your choice: ")?;
            match choice {
                1 => self.register_consumer()?,
                2 => self.list_consumers(),
                3 => self.enter_bill()?,
                4 => self.show_report()?,
                5 => {
                    println!("Exiting the program.");
                    return Ok(());
                }
                _ => println!("Choose an option between 1-5."),
            }
        }
    }

    fn register_consumer(&mut self) -> Result<()> {
        let consumer_id = prompt_u32("Enter consumer ID: ")?;
        if self.consumers.exists(consumer_id) {
            println!("Consumer already exists.");
            return Ok(());
        }

        let name = prompt_until_valid("Enter consumer's name: ", is_valid_name)?;
        let address = prompt_until_valid_with(
            "Enter consumer's address: ",
            is_valid_address,
            "Invalid address (at least 7 characters).",
        )?;
        let mobile_no = prompt_until_valid_with(
            "Enter consumer's mobile number: ",
            |s| is_valid_mobile(s),
            "Invalid mobile number (exactly 10 digits).",
        )?;

        match self
            .consumers
            .add(Consumer::new(consumer_id, name, address, mobile_no))
        {
            Ok(()) => println!("Consumer successfully added."),
            Err(err) => println!("{}.", err),
        }
        Ok(())
    }

    fn list_consumers(&self) {
        if self.consumers.is_empty() {
            println!("No consumer records found.");
            return;
        }

        println!("\nList of Consumers:");
        println!("{:-<65}", "");
        println!(
            "| {:<12} | {:<14} | {:<14} | {:<12} |",
            "Consumer ID", "Name", "Address", "Mobile No."
        );
        println!("{:-<65}", "");
        for c in self.consumers.all_sorted_by_id() {
            println!(
                "| {:<12} | {:<14} | {:<14} | {:<12} |",
                c.consumer_id, c.name, c.address, c.mobile_no
            );
        }
        println!("{:-<65}", "");
    }

    fn enter_bill(&mut self) -> Result<()> {
        let consumer_id = prompt_u32("Enter consumer ID: ")?;
        if !self.consumers.exists(consumer_id) {
            println!("Consumer not found.");
            return Ok(());
        }

        let month = prompt_u32_until("Enter month: ", is_valid_month, "Invalid month.")?;
        let year = prompt_u32_until("Enter year: ", is_valid_year, "Invalid year.")?;
        let units_consumed = prompt_u32("Enter total units consumed: ")?;

        match self.service.enter_bill(
            &self.consumers,
            &mut self.bills,
            consumer_id,
            month,
            year,
            units_consumed,
        ) {
            Ok(amount) => println!("Bill added successfully. Amount due: {:.2}", amount),
            Err(BillEntryError::AlreadyBilled(_)) => {
                println!("Bill already exists for the given month and year.")
            }
            Err(BillEntryError::ConsumerNotFound(_)) => println!("Consumer not found."),
        }
        Ok(())
    }

    fn show_report(&self) -> Result<()> {
        let consumer_id = prompt_u32("Enter consumer ID: ")?;
        if !self.consumers.exists(consumer_id) {
            println!("Consumer not found.");
            return Ok(());
        }

        let month = prompt_u32("Enter month: ")?;
        let year = prompt_u32("Enter year: ")?;

        let report = match self
            .service
            .generate_report(&self.consumers, &self.bills, consumer_id, month, year)
        {
            Ok(report) => report,
            Err(ReportError::ConsumerNotFound(_)) => {
                println!("Consumer not found.");
                return Ok(());
            }
            Err(ReportError::BillNotFound { .. }) => {
                println!("No bill found for the given month and year.");
                return Ok(());
            }
        };

        println!(
            "\nBill for {}/{} for consumer {} (generated {}):",
            month,
            year,
            consumer_id,
            Utc::now().format("%Y-%m-%d")
        );
        println!("{:-<42}", "");
        println!("| {:<15} | {:<20} |", "Consumer Name", report.consumer.name);
        println!("| {:<15} | {:<20} |", "Address", report.consumer.address);
        println!("| {:<15} | {:<20} |", "Mobile Number", report.consumer.mobile_no);
        println!("| {:<15} | {:<20} |", "Units Consumed", report.current.units_consumed);
        println!(
            "| {:<15} | {:<20.2} |",
            "Amount Due", report.current.amount
        );
        println!("{:-<42}", "");

        if report.recent_history.is_empty() {
            println!("\nNo prior bills recorded for this consumer.");
        } else {
            println!("\nPrevious Bills:");
            for bill in &report.recent_history {
                println!(
                    "  Month: {}/{} - Amount: {:.2}",
                    bill.month, bill.year, bill.amount
                );
            }
            println!("{:-<28}", "");
        }
        Ok(())
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PROMPT HELPERS
// ============================================================================

fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes_read = io::stdin().lock().read_line(&mut line)?;
    if bytes_read == 0 {
        // Stdin closed; bail instead of re-prompting into the void
        bail!("input closed before the session ended");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse prompt input as a non-negative integer; blank or non-numeric
/// input is rejected so the caller can re-prompt
fn parse_u32(input: &str) -> Option<u32> {
    input.trim().parse().ok()
}

/// Prompt for an integer, re-prompting until one parses
fn prompt_u32(label: &str) -> Result<u32> {
    loop {
        let line = prompt_line(label)?;
        match parse_u32(&line) {
            Some(value) => return Ok(value),
            None => println!("Invalid input. Please enter a non-negative integer."),
        }
    }
}

/// Prompt for an integer until it passes the given check
fn prompt_u32_until(label: &str, check: fn(u32) -> bool, message: &str) -> Result<u32> {
    loop {
        let value = prompt_u32(label)?;
        if check(value) {
            return Ok(value);
        }
        println!("{}", message);
    }
}

/// Prompt for text until it passes the given check
fn prompt_until_valid(label: &str, check: fn(&str) -> bool) -> Result<String> {
    prompt_until_valid_with(label, check, "Invalid input.")
}

fn prompt_until_valid_with(
    label: &str,
    check: impl Fn(&str) -> bool,
    message: &str,
) -> Result<String> {
    loop {
        let value = prompt_line(label)?;
        if check(&value) {
            return Ok(value);
        }
        println!("{}", message);
    }
}

// ============================================================================
// TESTS
// ============================================================================
