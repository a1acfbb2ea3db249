// Tratamento de erros ergonômico
use anyhow::{Context, Result};

// Logging para stderr (-v, -vv, ...)
use log::{debug, info};

use pingrs_echo::icmp::{self, IcmpMessage};

mod args;

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Próxima sequência: incrementa e pula o 0 no wrap around.
fn next_seq(seq: u16) -> u16 {
    match seq.wrapping_add(1) {
        0 => 1,
        n => n,
    }
}

/// Soma sobre o buffer inteiro (checksum incluso) deve dar 0.
fn checksum_ok(buf: &[u8]) -> bool {
    icmp::checksum(buf) == 0
}

fn seq_line(seq: u16, pkt: &[u8]) -> String {
    format!("icmp_seq={} bytes={} {}", seq, pkt.len(), to_hex(pkt))
}

/// Decodifica um buffer recebido de fora e mostra os campos.
fn decode(hex: &str) -> Result<()> {
    let buf = args::parse_hex(hex)?;
    let msg = IcmpMessage::try_from(buf.as_slice()).context("Falha ao decodificar ICMP")?;

    let kind = if msg.is_echo_request() {
        "echo request"
    } else if msg.is_echo_reply() {
        "echo reply"
    } else {
        "desconhecido"
    };

    println!("type={} ({}) code={}", msg.typ(), kind, msg.code());
    println!("checksum={:#06x}", msg.checksum());
    println!(
        "id={} seq={} payload={} bytes",
        msg.identifier(),
        msg.sequence_number(),
        msg.payload().len()
    );
    println!(
        "checksum {}",
        if checksum_ok(&buf) { "ok" } else { "inválido" }
    );

    Ok(())
}

/// Gera `count` mensagens Echo com sequence crescente e imprime em hex.
fn encode(args: &args::PingArgs) {
    // Identificador: usa o PID do processo (comum em pings)
    let ident = args.ident.unwrap_or(std::process::id() as u16);
    let payload = args.payload.as_bytes();

    info!(
        "Gerando {} mensagem(ns) id={} com {} bytes de dados",
        args.count,
        ident,
        payload.len()
    );

    let mut seq = 1u16;
    for _ in 0..args.count {
        let msg = if args.reply {
            IcmpMessage::echo_reply(ident, seq, payload)
        } else {
            IcmpMessage::echo_request(ident, seq, payload)
        };

        let pkt = msg.encode();
        debug!("icmp_seq={} checksum={:02x}{:02x}", seq, pkt[2], pkt[3]);
        println!("{}", seq_line(seq, &pkt));

        seq = next_seq(seq);
    }
}

fn main() -> Result<()> {
    let args = args::parse()?;

    if args.help {
        println!("{}", args::USAGE);
        return Ok(());
    }

    stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbosity + 1)
        .init()
        .context("Erro ao configurar logging")?;

    match &args.decode {
        Some(hex) => decode(hex),
        None => {
            encode(&args);
            Ok(())
        }
    }
}
