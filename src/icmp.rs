use log::{debug, trace};
use thiserror::Error;

/// Tamanho fixo do cabeçalho Echo: type, code, checksum, identifier, sequence.
pub const HEADER_LEN: usize = 8;

/// Mínimo aceito por `decode`: type, code e os 2 bytes de checksum.
pub const MIN_DECODE_LEN: usize = 4;

pub const ECHO_REPLY: u8 = 0;
pub const ECHO_REQUEST: u8 = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcmpError {
    #[error("buffer ICMP truncado: {len} bytes (mínimo {})", MIN_DECODE_LEN)]
    Truncated { len: usize },
}

/// Mensagem ICMPv4 Echo Request/Reply (RFC 792).
///
/// O checksum não é definido pelo chamador: vale 0 após a construção,
/// é recalculado a cada `encode` e, após `decode`, guarda o valor lido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpMessage {
    typ: u8,
    code: u8,
    checksum: u16,
    identifier: u16,
    sequence_number: u16,
    payload: Vec<u8>,
}

impl Default for IcmpMessage {
    /// Echo Request (type=8, code=0) sem payload.
    fn default() -> Self {
        Self::new(ECHO_REQUEST, 0, 0, 0, &[])
    }
}

impl IcmpMessage {
    pub fn new(typ: u8, code: u8, identifier: u16, sequence_number: u16, payload: &[u8]) -> Self {
        Self {
            typ,
            code,
            checksum: 0,
            identifier,
            sequence_number,
            payload: payload.to_vec(),
        }
    }

    pub fn echo_request(identifier: u16, sequence_number: u16, payload: &[u8]) -> Self {
        Self::new(ECHO_REQUEST, 0, identifier, sequence_number, payload)
    }

    pub fn echo_reply(identifier: u16, sequence_number: u16, payload: &[u8]) -> Self {
        Self::new(ECHO_REPLY, 0, identifier, sequence_number, payload)
    }

    pub fn typ(&self) -> u8 {
        self.typ
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    pub fn sequence_number(&self) -> u16 {
        self.sequence_number
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_echo_request(&self) -> bool {
        self.typ == ECHO_REQUEST
    }

    pub fn is_echo_reply(&self) -> bool {
        self.typ == ECHO_REPLY
    }

    /// Tamanho do pacote gerado por `encode`.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    /// Serializa cabeçalho + payload e escreve o checksum nos bytes 2..4.
    pub fn encode(&self) -> Vec<u8> {
        let mut pkt = Vec::with_capacity(self.encoded_len());

        // Type, Code, checksum placeholder (2 bytes)
        pkt.extend_from_slice(&[self.typ, self.code, 0, 0]);

        // Identifier e Sequence (big-endian)
        pkt.extend_from_slice(&self.identifier.to_be_bytes());
        pkt.extend_from_slice(&self.sequence_number.to_be_bytes());

        pkt.extend_from_slice(&self.payload);

        let csum = checksum(&pkt);
        pkt[2..4].copy_from_slice(&csum.to_be_bytes());

        trace!(
            "codificado type={} code={} id={} seq={} tamanho={} checksum={:#06x}",
            self.typ,
            self.code,
            self.identifier,
            self.sequence_number,
            pkt.len(),
            csum
        );

        pkt
    }

    /// Preenche a mensagem a partir de `buf`.
    ///
    /// Só exige os 4 primeiros bytes. Identifier e sequence são lidos apenas
    /// se o cabeçalho completo estiver presente; caso contrário mantêm o valor
    /// anterior e o payload fica vazio. O checksum não é verificado.
    /// Em caso de erro nenhum campo é alterado.
    pub fn decode(&mut self, buf: &[u8]) -> Result<(), IcmpError> {
        if buf.len() < MIN_DECODE_LEN {
            debug!("decodificação rejeitada: {} bytes", buf.len());
            return Err(IcmpError::Truncated { len: buf.len() });
        }

        self.typ = buf[0];
        self.code = buf[1];
        self.checksum = u16::from_be_bytes([buf[2], buf[3]]);

        if buf.len() >= HEADER_LEN {
            self.identifier = u16::from_be_bytes([buf[4], buf[5]]);
            self.sequence_number = u16::from_be_bytes([buf[6], buf[7]]);
            self.payload = buf[HEADER_LEN..].to_vec();
        } else {
            self.payload.clear();
        }

        debug!(
            "decodificado type={} code={} id={} seq={} payload={} bytes",
            self.typ,
            self.code,
            self.identifier,
            self.sequence_number,
            self.payload.len()
        );

        Ok(())
    }
}

impl TryFrom<&[u8]> for IcmpMessage {
    type Error = IcmpError;

    fn try_from(buf: &[u8]) -> Result<Self, Self::Error> {
        let mut msg = Self::default();
        msg.decode(buf)?;
        Ok(msg)
    }
}

/// Checksum da Internet (RFC 1071) sobre palavras de 16 bits big-endian.
/// Um byte final ímpar é tratado como o byte alto de uma palavra com zero.
pub fn checksum(mut data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    while data.len() >= 2 {
        sum = sum.wrapping_add(u16::from_be_bytes([data[0], data[1]]) as u32);
        data = &data[2..];
    }
    if !data.is_empty() {
        sum = sum.wrapping_add((data[0] as u32) << 8);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}
