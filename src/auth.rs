use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub fn read_base_key() -> Result<Zeroizing<String>> {
    //  Environment Variable
    //  TEXTCRYPT_KEY="Secr3tPass" textcrypt encrypt "hello"
    if let Ok(key) = std::env::var("TEXTCRYPT_KEY") {
        if !key.is_empty() {
            return Ok(Zeroizing::new(key));
        }
    }

    //  stdin (Pipeline): the first line is the key, the rest is payload
    //  printf "%s\n%s" "$KEY" "hello" | textcrypt encrypt
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let key = rpassword::prompt_password("Base key: ")?;
        if !key.is_empty() {
            return Ok(Zeroizing::new(key));
        }
    }

    bail!("No base key provided")
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
