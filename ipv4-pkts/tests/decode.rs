//! Integration tests for ipv4-pkts

use std::net::Ipv4Addr;

use ipv4_pkts::layers::icmp::IcmpRef;
use ipv4_pkts::layers::ip::DATA_PROTO_TCP;
use ipv4_pkts::prelude::*;

// SYN from 192.168.0.23:51000 to 93.184.216.34:443 carrying MSS/SACK/timestamp/wscale options.
const TCP_SYN: [u8; 60] = [
    0x45, 0x00, 0x00, 0x3c, 0xb4, 0x6e, 0x40, 0x00, 0x40, 0x06, 0x00, 0x00, 0xc0, 0xa8, 0x00,
    0x17, 0x5d, 0xb8, 0xd8, 0x22, 0xc7, 0x38, 0x01, 0xbb, 0x9e, 0x1b, 0x5c, 0x2a, 0x00, 0x00,
    0x00, 0x00, 0xa0, 0x02, 0xfa, 0xf0, 0x3c, 0x91, 0x00, 0x00, 0x02, 0x04, 0x05, 0xb4, 0x04,
    0x02, 0x08, 0x0a, 0x00, 0x9a, 0x1c, 0x4f, 0x00, 0x00, 0x00, 0x00, 0x01, 0x03, 0x03, 0x07,
];

// Port unreachable from a router, with a router alert option in the IPv4 header.
const ICMP_UNREACHABLE: [u8; 32] = [
    0x46, 0xc0, 0x00, 0x20, 0x00, 0x2a, 0x00, 0x00, 0xff, 0x01, 0x00, 0x00, 0x0a, 0x00, 0x00,
    0xfe, 0x0a, 0x00, 0x00, 0x05, 0x94, 0x04, 0x00, 0x00, 0x03, 0x03, 0x12, 0x34, 0x00, 0x00,
    0x00, 0x00,
];

#[test]
fn decode_tcp_syn() {
    let ip = Ipv4Ref::from_bytes(&TCP_SYN).unwrap();

    assert_eq!(ip.version(), 4);
    assert_eq!(ip.protocol(), DATA_PROTO_TCP);
    assert_eq!(ip.header_length(), 20);
    assert_eq!(ip.data_length(), 40);
    assert!(ip.flags().dont_fragment());

    let tcp = ip.payload().tcp().expect("TCP payload");
    assert_eq!(tcp.sport(), 51000);
    assert_eq!(tcp.dport(), 443);
    assert_eq!(tcp.data_offset(), 10);
    assert_eq!(tcp.flags(), TcpFlags::SYN);
    assert_eq!(tcp.options().len(), 20);
    assert_eq!(tcp.data_length(), 0);
    assert_eq!(tcp.window(), 0xfaf0);

    assert_eq!(
        ip.to_string(),
        "IP from 192.168.0.23 to 93.184.216.34, id=46190, pload_t=TCP from 51000 to 443"
    );
}

#[test]
fn flow_key_for_outbound_syn() {
    let ip = Ipv4Ref::from_bytes(&TCP_SYN).unwrap();
    let local = Ipv4Addr::new(192, 168, 0, 23);
    let remote = Ipv4Addr::new(93, 184, 216, 34);

    // An outbound segment has its local end as the source, so the key must be flipped.
    let key = flow_key(&ip, true).unwrap();
    assert_eq!(key.remote_addr, remote);
    assert_eq!(key.remote_port, 443);
    assert_eq!(key.local_addr, local);
    assert_eq!(key.local_port, 51000);

    assert_eq!(flow_key(&ip, false), Some(key.flipped()));
}

#[test]
fn decode_icmp_with_ip_options() {
    let ip = Ipv4Ref::from_bytes(&ICMP_UNREACHABLE).unwrap();

    assert_eq!(ip.ihl(), 6);
    assert_eq!(ip.header_length(), 24);
    assert_eq!(ip.options(), &[0x94, 0x04, 0x00, 0x00]);
    assert_eq!(ip.dscp(), 0x18);
    assert_eq!(ip.ttl(), 255);

    let icmp: &IcmpRef<'_> = ip.payload().icmp().expect("ICMP payload");
    assert_eq!(icmp.icmp_type(), 3);
    assert_eq!(icmp.code(), 3);
    assert_eq!(
        ip.payload().to_string(),
        "ICMP Type 3 (Destination Unreachable) Code 3 (Destination port unreachable)"
    );
    assert_eq!(flow_key(&ip, false), None);
}

#[test]
fn capture_truncated_inside_tcp_header() {
    let ip = Ipv4Ref::from_bytes(&TCP_SYN[..45]).unwrap();

    // The IPv4 header still decodes and trusts its own Total Length.
    assert_eq!(ip.data_length(), 40);
    match ip.payload() {
        Payload::Invalid(err) => {
            assert_eq!(err.class, DecodeErrorClass::TruncatedHeader);
            assert_eq!(err.layer, "TCP");
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn truncated_ip_header_is_an_error() {
    let err = Ipv4Ref::from_bytes(&TCP_SYN[..19]).unwrap_err();
    assert_eq!(err.class, DecodeErrorClass::TruncatedHeader);
    assert!(Ipv4Ref::validate(&TCP_SYN[..19]).is_err());
    assert!(err.to_string().starts_with("IPv4 decode failed (truncated header)"));
}

#[test]
fn padded_capture_keeps_transport_lengths_independent() {
    let mut padded = TCP_SYN.to_vec();
    padded.extend([0u8; 6]);
    let ip = Ipv4Ref::from_bytes(&padded).unwrap();

    assert_eq!(ip.data_length(), 40);
    assert_eq!(ip.payload().lengths(), Some((40, 6)));
}

#[test]
fn decoding_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                let ip = Ipv4Ref::from_bytes(&ICMP_UNREACHABLE).unwrap();
                ip.to_string()
            })
        })
        .collect();

    let expected = Ipv4Ref::from_bytes(&ICMP_UNREACHABLE).unwrap().to_string();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
