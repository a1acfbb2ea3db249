use anyhow::{Context, Result};

pub struct PingArgs {
    pub count: u64,
    pub ident: Option<u16>,
    pub payload: String,
    pub reply: bool,
    pub decode: Option<String>,
    pub verbosity: usize,
    pub help: bool,
}

pub const USAGE: &str =
    "Uso: pingrs_echo [-c <count>] [-i <ident>] [-p <payload>] [--reply] [-v] | --decode <hex>";

pub fn parse() -> Result<PingArgs> {
    let args: Vec<String> = std::env::args().collect();
    parse_from(&args)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("Faltou o valor para {flag}"))
}

pub fn parse_from(args: &[String]) -> Result<PingArgs> {
    let mut parsed = PingArgs {
        count: 1,
        ident: None,
        payload: String::from("pingrs"),
        reply: false,
        decode: None,
        verbosity: 0,
        help: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" => {
                let c: u64 = value(args, i, "-c")?
                    .parse()
                    .context("Valor inválido para -c")?;
                parsed.count = c;
                i += 1;
            }
            "-i" => {
                let id: u16 = value(args, i, "-i")?
                    .parse()
                    .context("Valor inválido para -i")?;
                parsed.ident = Some(id);
                i += 1;
            }
            "-p" => {
                parsed.payload = value(args, i, "-p")?.to_string();
                i += 1;
            }
            "--decode" => {
                parsed.decode = Some(value(args, i, "--decode")?.to_string());
                i += 1;
            }
            "--reply" => parsed.reply = true,
            "-h" | "--help" => parsed.help = true,
            flag if flag.starts_with("-v") && flag[1..].chars().all(|c| c == 'v') => {
                parsed.verbosity += flag.len() - 1;
            }
            other => anyhow::bail!("Argumento desconhecido: {other}\n{USAGE}"),
        }
        i += 1;
    }

    Ok(parsed)
}

/// Converte uma string hex ("08 00 f7 ff" ou "0800f7ff") em bytes.
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let digits: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if digits.len() % 2 != 0 {
        anyhow::bail!("Hex com número ímpar de dígitos");
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            let pair = digits.get(i..i + 2).context("Hex inválido")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("Hex inválido: {pair}"))
        })
        .collect()
}
