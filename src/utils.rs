/// Get a systemd credential (see <https://systemd.io/CREDENTIALS/>).
#[cfg(target_os = "linux")]
pub(crate) fn get_credential(name: &str) -> anyhow::Result<secrecy::SecretString> {
    use libsystemd::credentials::CredentialsLoader;
    use std::io::{BufReader, Read};

    let loader = CredentialsLoader::open()?;
    let file = loader.get(name)?;
    let mut buffer = String::new();
    let mut reader = BufReader::new(file);
    reader.read_to_string(&mut buffer)?;
    Ok(buffer.trim_end().to_owned().into())
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn get_credential(name: &str) -> anyhow::Result<secrecy::SecretString> {
    anyhow::bail!("systemd credential {name} is only available on Linux")
}
