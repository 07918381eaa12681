use gandalf_connect_core::Connect;

pub fn run(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let data_key = Connect::get_data_key_from_url(url)?;
    println!("{data_key}");
    Ok(())
}
