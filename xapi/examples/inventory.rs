//! Lists the storage repositories of a toolstack.
//!
//! Usage: `cargo run --example inventory -- <addr> <user> <password>`

use xapi::{api::sr, tcp, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:80".into());
    let uname = args.next().unwrap_or_else(|| "root".into());
    let pwd = args.next().unwrap_or_default();

    let conn = tcp::connect(addr).await?;
    let session = Session::login_with_password(conn, &uname, &pwd, "2.3", "inventory").await?;

    let mut records: Vec<_> = sr::get_all_records(&session).await?.into_values().collect();
    records.sort_by(|a, b| a.name_label.cmp(&b.name_label));
    for record in records {
        println!(
            "{:<30} {:>8} GiB  {} ({})",
            record.name_label,
            record.physical_size / (1 << 30),
            record.uuid,
            record.r#type,
        );
    }

    session.logout().await?;

    Ok(())
}
