use bank_statement_import::{ParserBuilder, PartnerRegistry};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let file_path = if args.len() > 1 {
        args[1].as_str()
    } else {
        println!("Using example CSV data from demos/sample.csv\n");
        "demos/sample.csv"
    };

    let content = std::fs::read_to_string(file_path)?;

    let mut partners = PartnerRegistry::default();
    partners.add(1, "Invoice 123 Clearing").add(2, "Bank fee");

    let batch = ParserBuilder::new()
        .content(&content)
        .filename(file_path)
        .import(&partners)?;

    println!(
        "Found {} transactions in {}\n",
        batch.transactions().count(),
        batch.currency_code.as_deref().unwrap_or("N/A")
    );

    for (i, tx) in batch.transactions().take(10).enumerate() {
        println!("Transaction {}:", i + 1);
        if let Some(date) = tx.date {
            println!("  Date: {}", date);
        }
        if let Some(amount) = tx.amount {
            println!("  Amount: {}", amount);
        }
        println!("  Name: {}", tx.name.as_deref().unwrap_or("N/A"));
        match tx.partner_id {
            Some(id) => println!("  Partner: {}", id.0),
            None => println!("  Partner: unresolved"),
        }
        println!();
    }

    Ok(())
}
