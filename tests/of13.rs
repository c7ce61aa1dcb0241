use smoltcp::wire::EthernetAddress;

use ofwire::of13::{self, features, flow_match, flow_mod, instruction, oxm, packet_in, queue};
use ofwire::{decode, encode, Error, Message};

fn of13_message(xid: u32, payload: of13::Payload) -> Message {
    Message::Of13(of13::Message { xid, payload })
}

fn round_trip(message: &Message) -> Vec<u8> {
    let bytes = encode(message).unwrap();
    assert_eq!(&decode(&bytes).unwrap(), message);
    // the header length field always equals the frame length.
    assert_eq!(
        u16::from_be_bytes([bytes[2], bytes[3]]) as usize,
        bytes.len()
    );
    bytes
}

#[test]
fn hello() {
    let message = of13_message(0, of13::Payload::Hello);
    let bytes = round_trip(&message);
    assert_eq!(&bytes[..], &[0x04, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn hello_with_trailing_elements_is_accepted() {
    // A 1.3.1+ peer may append hello elements; they are ignored.
    let bytes = [
        0x04, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x10,
    ];
    assert_eq!(
        decode(&bytes).unwrap(),
        of13_message(0, of13::Payload::Hello)
    );
}

#[test]
fn echo_request() {
    let message = of13_message(
        0x1234_5678,
        of13::Payload::EchoRequest(vec![0xde, 0xad, 0xbe, 0xef]),
    );
    let bytes = round_trip(&message);
    assert_eq!(
        &bytes[..],
        &[0x04, 0x02, 0x00, 0x0c, 0x12, 0x34, 0x56, 0x78, 0xde, 0xad, 0xbe, 0xef]
    );
}

#[test]
fn echo_reply_empty() {
    let message = of13_message(9, of13::Payload::EchoReply(vec![]));
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8);
}

#[test]
fn features_reply() {
    let message = of13_message(
        1,
        of13::Payload::FeaturesReply(features::FeaturesReplyRepr {
            datapath_id: 0x6677,
            datapath_mac: EthernetAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            n_buffers: 256,
            n_tables: 8,
            auxiliary_id: 0,
            capabilities: vec![
                features::Capability::FlowStats,
                features::Capability::TableStats,
            ],
            reserved: 0,
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 32);
    assert_eq!(&bytes[0..4], &[0x04, 0x06, 0x00, 0x20]);
    assert_eq!(&bytes[8..16], &[0x66, 0x77, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    // capabilities bitmap: flow_stats | table_stats.
    assert_eq!(&bytes[24..28], &[0x00, 0x00, 0x00, 0x03]);
}

#[test]
fn barrier_messages_are_bare_headers() {
    for payload in vec![
        of13::Payload::BarrierRequest,
        of13::Payload::BarrierReply,
        of13::Payload::FeaturesRequest,
        of13::Payload::GetConfigRequest,
        of13::Payload::GetAsyncRequest,
    ] {
        let bytes = round_trip(&of13_message(3, payload));
        assert_eq!(bytes.len(), 8);
    }
}

#[test]
fn eth_type_match_in_packet_in() {
    let message = of13_message(
        7,
        of13::Payload::PacketIn(packet_in::PacketInRepr {
            buffer_id: 0xffff_ffff,
            total_len: 4,
            reason: packet_in::Reason::NoMatch,
            table_id: 0,
            cookie: 0,
            flow_match: flow_match::FlowMatchRepr(vec![oxm::Oxm::Basic(oxm::FieldRepr {
                field: oxm::Field::EthType,
                value: vec![0x08, 0x00],
                mask: None,
            })]),
            data: vec![0x68, 0x6f, 0x67, 0x65],
        }),
    );
    let bytes = round_trip(&message);
    // 8 header + 16 fixed + 16 match + 2 pad + 4 frame.
    assert_eq!(bytes.len(), 46);
    // the match itself: type 1, length 10, one 6-byte TLV, 6 bytes pad.
    assert_eq!(&bytes[24..34], &[0x00, 0x01, 0x00, 0x0a, 0x80, 0x00, 0x0a, 0x02, 0x08, 0x00]);
}

#[test]
fn flow_mod_with_instructions() {
    let message = of13_message(
        42,
        of13::Payload::FlowMod(flow_mod::FlowModRepr {
            cookie: 0xfeed,
            cookie_mask: 0,
            table_id: 0,
            command: flow_mod::Command::Add,
            idle_timeout: 60,
            hard_timeout: 0,
            priority: 100,
            buffer_id: 0xffff_ffff,
            out_port: ofwire::PortNumber::Any,
            out_group: 0xffff_ffff,
            flags: vec![flow_mod::FlowModFlags::SendFlowRem],
            flow_match: flow_match::FlowMatchRepr(vec![oxm::Oxm::Basic(oxm::FieldRepr {
                field: oxm::Field::InPort,
                value: vec![0x00, 0x00, 0x00, 0x01],
                mask: None,
            })]),
            instructions: vec![
                instruction::InstructionRepr::Meter(3),
                instruction::InstructionRepr::ApplyActions(vec![0, 0, 0, 8, 0, 0, 0, 2]),
                instruction::InstructionRepr::GotoTable(1),
            ],
        }),
    );
    round_trip(&message);
}

#[test]
fn group_mod() {
    let message = of13_message(
        5,
        of13::Payload::GroupMod(ofwire::GroupModRepr {
            command: ofwire::GroupCommand::Add,
            kind: ofwire::GroupType::Select,
            group_id: 1,
            buckets: vec![ofwire::Bucket {
                weight: 2,
                watch_port: ofwire::PortNumber::Any,
                watch_group: 0xffff_ffff,
                actions: vec![0, 0, 0, 8, 0, 0, 0, 1],
            }],
        }),
    );
    round_trip(&message);
}

#[test]
fn meter_mod() {
    use of13::meter_mod::{Band, Command, MeterFlags, MeterModRepr};

    let message = of13_message(
        11,
        of13::Payload::MeterMod(MeterModRepr {
            command: Command::Add,
            flags: vec![MeterFlags::Kbps, MeterFlags::Stats],
            meter_id: 1,
            bands: vec![Band::Drop {
                rate: 10_000,
                burst_size: 1_000,
            }],
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8 + 8 + 16);
}

#[test]
fn role_request() {
    use of13::role::{ControllerRole, RoleRepr};

    let message = of13_message(
        2,
        of13::Payload::RoleRequest(RoleRepr {
            role: ControllerRole::Slave,
            generation_id: 0xff,
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 24);
}

#[test]
fn set_async() {
    use of13::async_config::AsyncConfigRepr;
    use of13::{flow_removed, packet_in};
    use ofwire::PortReason;

    let message = of13_message(
        8,
        of13::Payload::SetAsync(AsyncConfigRepr {
            packet_in_mask: [
                vec![packet_in::Reason::NoMatch, packet_in::Reason::Action],
                vec![packet_in::Reason::NoMatch],
            ],
            port_status_mask: [
                vec![PortReason::Add, PortReason::Delete, PortReason::Modify],
                vec![],
            ],
            flow_removed_mask: [
                vec![
                    flow_removed::Reason::IdleTimeout,
                    flow_removed::Reason::HardTimeout,
                ],
                vec![],
            ],
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 32);
    assert_eq!(&bytes[8..12], &[0x00, 0x00, 0x00, 0x03]);
}

#[test]
fn queue_get_config_reply() {
    let message = of13_message(
        4,
        of13::Payload::QueueGetConfigReply(queue::GetConfigReplyRepr {
            port: ofwire::PortNumber::Regular(1),
            queues: vec![queue::QueueRepr {
                queue_id: 1,
                port_no: ofwire::PortNumber::Regular(1),
                properties: vec![
                    queue::QueueProperty::MinRate(100),
                    queue::QueueProperty::MaxRate(900),
                ],
            }],
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8 + 8 + 16 + 32);
}

#[test]
fn stats_desc_reply() {
    use ofwire::stats::DescStats;

    let message = of13_message(
        6,
        of13::Payload::StatsReply(of13::stats::ReplyRepr {
            flags: 0,
            body: of13::stats::ReplyBody::Desc(DescStats {
                mfr_desc: "ofwire".to_string(),
                hw_desc: "none".to_string(),
                sw_desc: "0.1.0".to_string(),
                serial_num: "1".to_string(),
                dp_desc: "software datapath".to_string(),
            }),
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8 + 8 + 1056);
}

#[test]
fn error_with_of13_only_type() {
    use ofwire::error::{Header, MeterModFailedCode};

    let message = of13_message(
        1,
        of13::Payload::Error(ofwire::error::ErrorMsgRepr {
            header: Header::MeterModFailed(MeterModFailedCode::BadRate),
            data: vec![],
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(&bytes[8..12], &[0x00, 0x0c, 0x00, 0x06]);
}

#[test]
fn table_features_multipart_is_rejected() {
    // a table-features multipart request: type 18, stats type 12.
    let request = [
        0x04, 0x12, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    assert_eq!(decode(&request), Err(Error::BadMessage));

    // the same stats type inside a multipart reply (type 19).
    let reply = [
        0x04, 0x13, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    assert_eq!(decode(&reply), Err(Error::BadMessage));
}

#[test]
fn truncated_frame() {
    assert_eq!(decode(&[0x04, 0x00, 0x00]), Err(Error::Truncated));
    // length field claims more than the buffer holds.
    assert_eq!(
        decode(&[0x04, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00]),
        Err(Error::Truncated)
    );
}

#[test]
fn length_field_below_header_size() {
    assert_eq!(
        decode(&[0x04, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]),
        Err(Error::LengthMismatch)
    );
}

#[test]
fn unknown_version() {
    assert_eq!(
        decode(&[0x09, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00]),
        Err(Error::UnknownTag)
    );
}

#[test]
fn unknown_message_type() {
    assert_eq!(
        decode(&[0x04, 0x63, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00]),
        Err(Error::UnknownTag)
    );
}
