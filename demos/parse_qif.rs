use bank_statement_import::ParserBuilder;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let file_path = if args.len() > 1 {
        args[1].as_str()
    } else {
        println!("Using example QIF data from demos/sample.qif\n");
        "demos/sample.qif"
    };

    let batch = ParserBuilder::new().filename(file_path).parse()?;

    for statement in &batch.statements {
        println!("Found {} transactions\n", statement.transactions.len());

        for (i, tx) in statement.transactions.iter().enumerate() {
            println!("Transaction {}:", i + 1);
            if let Some(date) = tx.date {
                println!("  Date: {}", date);
            }
            if let Some(amount) = tx.amount {
                println!("  Amount: {}", amount);
            }
            println!("  Name: {}", tx.name.as_deref().unwrap_or("N/A"));
            if let Some(reference) = &tx.reference {
                println!("  Ref: {}", reference);
            }
            println!();
        }

        println!("Closing balance: {}", statement.balance_end_real);
    }

    Ok(())
}
