use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
use std::io::Read;
use textcrypt::{
    AesCipher, AesKeySize, Cipher, DesCipher, RsaCipher, RsaKeySize, RsaPadding, TextCipher, des,
    keygen,
};
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CipherKind {
    /// Instance-scoped DES envelope
    Des,
    /// Process-wide DES envelope (one-time initialization)
    DesShared,
    Aes128,
    Aes192,
    Aes256,
}

impl CipherKind {
    fn aes_size(self) -> Option<AesKeySize> {
        match self {
            CipherKind::Aes128 => Some(AesKeySize::Aes128),
            CipherKind::Aes192 => Some(AesKeySize::Aes192),
            CipherKind::Aes256 => Some(AesKeySize::Aes256),
            CipherKind::Des | CipherKind::DesShared => None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "textcrypt")]
#[command(
    version,
    about = "Encrypt and decrypt text with DES, AES, or RSA envelopes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generates fresh key material for a cipher and prints it
    Keygen {
        #[arg(long, value_enum, default_value_t = CipherKind::Des)]
        cipher: CipherKind,
    },

    /// Encrypts text (from the argument or stdin) to base64 ciphertext
    Encrypt {
        #[arg(long, value_enum, default_value_t = CipherKind::Des)]
        cipher: CipherKind,

        /// IV override as hex (8 bytes for DES, 16 for AES)
        #[arg(long, value_name = "HEX")]
        iv: Option<String>,

        /// Salt override as hex (8 bytes, DES only)
        #[arg(long, value_name = "HEX")]
        salt: Option<String>,

        text: Option<String>,
    },

    /// Decrypts base64 ciphertext (from the argument or stdin)
    Decrypt {
        #[arg(long, value_enum, default_value_t = CipherKind::Des)]
        cipher: CipherKind,

        /// IV override as hex (8 bytes for DES, 16 for AES)
        #[arg(long, value_name = "HEX")]
        iv: Option<String>,

        /// Salt override as hex (8 bytes, DES only)
        #[arg(long, value_name = "HEX")]
        salt: Option<String>,

        text: Option<String>,
    },

    /// Generates an RSA key pair, prints the public key, then encrypts
    /// and decrypts the given text once
    RsaDemo {
        /// Key size in bits (384, 512, 1024, 2048, 4096, 8192, 16384)
        #[arg(long, default_value_t = 2048)]
        bits: usize,

        /// Use OAEP padding instead of PKCS#1 v1.5
        #[arg(long)]
        oaep: bool,

        text: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    match args.command {
        Commands::Keygen { cipher } => keygen_cmd(cipher)?,
        Commands::Encrypt {
            cipher,
            iv,
            salt,
            text,
        } => crypt_cmd(cipher, iv, salt, text, true)?,
        Commands::Decrypt {
            cipher,
            iv,
            salt,
            text,
        } => crypt_cmd(cipher, iv, salt, text, false)?,
        Commands::RsaDemo { bits, oaep, text } => rsa_demo(bits, oaep, text)?,
    }
    Ok(())
}

fn keygen_cmd(cipher: CipherKind) -> Result<()> {
    match cipher.aes_size() {
        Some(size) => {
            println!("key:  {}", keygen::generate_aes_key(size)?);
            println!("iv:   {}", to_hex(&keygen::generate_aes_iv()?));
        }
        None => {
            println!("base key: {}", keygen::generate_base_key()?);
            println!("salt:     {}", to_hex(&keygen::generate_salt()?));
            println!("iv:       {}", to_hex(&keygen::generate_des_iv()?));
        }
    }
    Ok(())
}

fn crypt_cmd(
    cipher: CipherKind,
    iv: Option<String>,
    salt: Option<String>,
    text: Option<String>,
    encrypting: bool,
) -> Result<()> {
    let key = auth::read_base_key()?;
    let iv = iv.map(|s| parse_hex(&s)).transpose()?;
    let salt = salt.map(|s| parse_hex(&s)).transpose()?;
    let text = read_text(text)?;

    let output = if let CipherKind::DesShared = cipher {
        if !des::shared::is_initialized() {
            des::shared::initialize(&key, iv.as_deref(), salt.as_deref())?;
        }
        if encrypting {
            des::shared::encrypt(&text)?
        } else {
            des::shared::decrypt(&text)?
        }
    } else {
        let cipher = build_cipher(cipher, &key, iv.as_deref(), salt.as_deref())?;
        if encrypting {
            cipher.encrypt_text(&text)?
        } else {
            cipher.decrypt_text(&text)?
        }
    };

    println!("{output}");
    Ok(())
}

fn build_cipher(
    kind: CipherKind,
    key: &Zeroizing<String>,
    iv: Option<&[u8]>,
    salt: Option<&[u8]>,
) -> Result<Cipher> {
    match kind.aes_size() {
        Some(size) => {
            if salt.is_some() {
                bail!("the AES envelope takes no salt; the key is used as supplied");
            }
            Ok(Cipher::Aes(AesCipher::new(key, iv, size)?))
        }
        None => Ok(Cipher::Des(DesCipher::new(key, iv, salt)?)),
    }
}

fn rsa_demo(bits: usize, oaep: bool, text: Option<String>) -> Result<()> {
    let size = RsaKeySize::try_from_bits(bits)?;
    let padding = if oaep {
        RsaPadding::Oaep
    } else {
        RsaPadding::Pkcs1v15
    };

    let cipher = RsaCipher::generate(size, padding)?;
    println!(
        "public key:\n{}\n",
        serde_json::to_string_pretty(&cipher.public_parts())?
    );

    let text = read_text(text)?;
    let encrypted = cipher.encrypt(&text)?;
    println!("encrypted:\n{encrypted}\n");
    println!("decrypted:\n{}", cipher.decrypt(&encrypted)?);
    Ok(())
}

/// Takes the payload from the argument, or reads the rest of stdin.
fn read_text(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    let text = buf.trim_end_matches(['\n', '\r']).to_string();
    if text.is_empty() {
        bail!("no text provided");
    }
    Ok(text)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    if !s.is_ascii() || s.len() % 2 != 0 {
        bail!("hex value must be an even number of hex digits");
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).context("invalid hex value"))
        .collect()
}
