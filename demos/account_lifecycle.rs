use form3api::{Account, AccountAttributes, AccountOperations, CancellationToken, Client};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let client = Client::from_env()?;
    let accounts = client.accounts();
    let cancel = CancellationToken::new();

    let mut attributes = AccountAttributes::new("GB");
    attributes.base_currency = Some("GBP".to_string());
    attributes.bank_id = Some("400300".to_string());
    attributes.bank_id_code = Some("GBDSC".to_string());
    attributes.bic = Some("NWBKGB22".to_string());
    attributes.account_classification = Some("Personal".to_string());
    attributes.secondary_identification = Some("A1B2C3D4".to_string());
    let account = Account::new(
        uuid::Uuid::new_v4().to_string(),
        "eb0bd6f5-c3f5-44b2-b677-acd23cdde73c",
        attributes,
    );

    println!("==== Step 1/5 Create account {}", account.id);
    let created = accounts.create(&account, &cancel).await?;
    check_attributes(&created, &account)?;

    println!("==== Step 2/5 Fetch account {}", account.id);
    let fetched = accounts.fetch(&account.id, &cancel).await?;
    check_attributes(&fetched, &account)?;

    println!("==== Step 3/5 List accounts");
    let listed = accounts.list(0, 100, &cancel).await?;
    println!("Found {} accounts", listed.len());

    println!(
        "==== Step 4/5 Delete account {} at version {}",
        fetched.id, fetched.version
    );
    accounts.delete(&fetched.id, fetched.version, &cancel).await?;

    println!("==== Step 5/5 Fetch deleted account");
    match accounts.fetch(&account.id, &cancel).await {
        Err(err) if err.is_not_found() => println!("Got expected 404: {err}"),
        Err(err) => return Err(err.into()),
        Ok(_) => return Err("deleted account is still present".into()),
    }

    println!("===== Success! =====");
    Ok(())
}

fn check_attributes(actual: &Account, expected: &Account) -> Result<(), Box<dyn Error>> {
    if actual.attributes != expected.attributes {
        return Err(format!(
            "attributes do not match: {:?}, expected {:?}",
            actual.attributes, expected.attributes
        )
        .into());
    }
    println!("Attributes match");
    Ok(())
}
