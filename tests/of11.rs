use smoltcp::wire::{EthernetAddress, Ipv4Address};

use ofwire::of11::{self, features, flow_match, flow_mod, instruction, queue, stats};
use ofwire::{decode, encode, Error, Message};

fn of11_message(xid: u32, payload: of11::Payload) -> Message {
    Message::Of11(of11::Message {
        experimental: false,
        xid,
        payload,
    })
}

fn round_trip(message: &Message) -> Vec<u8> {
    let bytes = encode(message).unwrap();
    assert_eq!(&decode(&bytes).unwrap(), message);
    assert_eq!(
        u16::from_be_bytes([bytes[2], bytes[3]]) as usize,
        bytes.len()
    );
    bytes
}

#[test]
fn hello() {
    let bytes = round_trip(&of11_message(0, of11::Payload::Hello));
    assert_eq!(&bytes[..], &[0x02, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn experimental_bit_rides_the_version_byte() {
    let message = Message::Of11(of11::Message {
        experimental: true,
        xid: 1,
        payload: of11::Payload::Hello,
    });
    let bytes = round_trip(&message);
    assert_eq!(bytes[0], 0x82);
}

#[test]
fn echo_round_trip() {
    round_trip(&of11_message(
        0xabcd,
        of11::Payload::EchoReply(vec![1, 2, 3]),
    ));
}

#[test]
fn features_reply_with_ports() {
    use ofwire::{PortFeature, PortNumber, PortRepr, PortState};

    let port = PortRepr {
        port_no: PortNumber::Regular(1),
        hw_addr: EthernetAddress([0x00, 0x01, 0x02, 0x03, 0x04, 0x05]),
        name: "eth0".to_string(),
        config: vec![],
        state: vec![PortState::Live],
        curr: vec![PortFeature::Rate1GbFd, PortFeature::Copper],
        advertised: vec![],
        supported: vec![],
        peer: vec![],
        curr_speed: 1_000_000,
        max_speed: 1_000_000,
    };
    let message = of11_message(
        2,
        of11::Payload::FeaturesReply(features::FeaturesReplyRepr {
            datapath_id: 0,
            datapath_mac: EthernetAddress([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
            n_buffers: 255,
            n_tables: 4,
            capabilities: vec![
                features::Capability::FlowStats,
                features::Capability::ArpMatchIp,
            ],
            reserved: 0,
            ports: vec![port],
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8 + 24 + 64);
    // the port state bitmap has exactly the live bit set.
    assert_eq!(&bytes[32 + 36..32 + 40], &[0, 0, 0, 1 << 2]);
}

#[test]
fn match_with_only_in_port_wildcards_the_rest() {
    use flow_match::{FlowMatchRepr, MatchField};

    let message = of11_message(
        3,
        of11::Payload::FlowMod(flow_mod::FlowModRepr {
            cookie: 0,
            cookie_mask: 0,
            table_id: 0,
            command: flow_mod::Command::Add,
            idle_timeout: 0,
            hard_timeout: 0,
            priority: 0,
            buffer_id: 0xffff_ffff,
            out_port: ofwire::PortNumber::Any,
            out_group: 0xffff_ffff,
            flags: vec![],
            flow_match: FlowMatchRepr(vec![MatchField::InPort(1)]),
            instructions: vec![],
        }),
    );
    let bytes = encode(&message).unwrap();
    assert_eq!(bytes.len(), 8 + 40 + 88);
    // wildcards: every non-mask bit except in_port.
    assert_eq!(&bytes[8 + 40 + 8..8 + 40 + 12], &[0x00, 0x00, 0x03, 0xfe]);
    // eth/ipv4 mask slots are all-ones.
    assert_eq!(&bytes[8 + 40 + 18..8 + 40 + 24], &[0xff; 6]);

    // decoding adds the four mask-carrying slots back explicitly.
    let decoded = match decode(&bytes).unwrap() {
        Message::Of11(message) => message,
        _ => unreachable!(),
    };
    match decoded.payload {
        of11::Payload::FlowMod(repr) => {
            let fields = repr.flow_match.0;
            assert_eq!(fields.len(), 5);
            assert_eq!(fields[0], MatchField::InPort(1));
            assert!(fields.contains(&MatchField::Ipv4Src {
                addr: Ipv4Address([0; 4]),
                mask: Ipv4Address([0xff; 4]),
            }));
        }
        _ => unreachable!(),
    }
}

#[test]
fn tcp_match_round_trips_through_flow_mod() {
    use flow_match::{FlowMatchRepr, MatchField};

    let fields = vec![
        MatchField::InPort(1),
        MatchField::EthSrc {
            addr: EthernetAddress([0, 1, 2, 3, 4, 5]),
            mask: EthernetAddress([0; 6]),
        },
        MatchField::EthDst {
            addr: EthernetAddress([5, 4, 3, 2, 1, 0]),
            mask: EthernetAddress([0; 6]),
        },
        MatchField::EthType(0x0800),
        MatchField::IpProto(6),
        MatchField::Ipv4Src {
            addr: Ipv4Address([10, 0, 0, 1]),
            mask: Ipv4Address([0, 0, 0, 0xff]),
        },
        MatchField::Ipv4Dst {
            addr: Ipv4Address([10, 0, 0, 2]),
            mask: Ipv4Address([0; 4]),
        },
        MatchField::TcpSrc(80),
        MatchField::TcpDst(8080),
    ];
    let message = of11_message(
        4,
        of11::Payload::FlowMod(flow_mod::FlowModRepr {
            cookie: 1,
            cookie_mask: 0,
            table_id: 2,
            command: flow_mod::Command::Add,
            idle_timeout: 30,
            hard_timeout: 300,
            priority: 10,
            buffer_id: 0xffff_ffff,
            out_port: ofwire::PortNumber::Any,
            out_group: 0xffff_ffff,
            flags: vec![flow_mod::FlowModFlags::SendFlowRem],
            flow_match: FlowMatchRepr(fields),
            instructions: vec![
                instruction::InstructionRepr::WriteMetadata {
                    metadata: 0xff,
                    mask: 0xffff,
                },
                instruction::InstructionRepr::ApplyActions(vec![0, 0, 0, 8, 0, 0, 0, 1]),
            ],
        }),
    );
    round_trip(&message);
}

#[test]
fn packet_in() {
    let message = of11_message(
        5,
        of11::Payload::PacketIn(of11::packet_in::PacketInRepr {
            buffer_id: 200,
            in_port: 3,
            in_phy_port: 3,
            total_len: 1000,
            reason: of11::packet_in::Reason::NoMatch,
            table_id: 0,
            data: vec![0x68, 0x6f, 0x67, 0x65],
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8 + 16 + 4);
}

#[test]
fn flow_removed() {
    use flow_match::{FlowMatchRepr, MatchField};

    let message = of11_message(
        6,
        of11::Payload::FlowRemoved(of11::flow_removed::FlowRemovedRepr {
            cookie: 7,
            priority: 100,
            reason: of11::flow_removed::Reason::IdleTimeout,
            table_id: 1,
            duration_sec: 60,
            duration_nsec: 0,
            idle_timeout: 30,
            packet_count: 12,
            byte_count: 1200,
            flow_match: FlowMatchRepr(vec![
                MatchField::InPort(2),
                MatchField::EthSrc {
                    addr: EthernetAddress([0; 6]),
                    mask: EthernetAddress([0xff; 6]),
                },
                MatchField::EthDst {
                    addr: EthernetAddress([0; 6]),
                    mask: EthernetAddress([0xff; 6]),
                },
                MatchField::Ipv4Src {
                    addr: Ipv4Address([0; 4]),
                    mask: Ipv4Address([0xff; 4]),
                },
                MatchField::Ipv4Dst {
                    addr: Ipv4Address([0; 4]),
                    mask: Ipv4Address([0xff; 4]),
                },
            ]),
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8 + 40 + 88);
}

#[test]
fn port_status_golden_state_bit() {
    use ofwire::{PortFeature, PortNumber, PortReason, PortRepr, PortState, PortStatusRepr};

    let message = of11_message(
        7,
        of11::Payload::PortStatus(PortStatusRepr {
            reason: PortReason::Modify,
            port: PortRepr {
                port_no: PortNumber::Regular(1),
                hw_addr: EthernetAddress([0x00, 0x01, 0x02, 0x03, 0x04, 0x05]),
                name: "eth0".to_string(),
                config: vec![],
                state: vec![PortState::Live],
                curr: vec![PortFeature::Rate1GbFd, PortFeature::Copper],
                advertised: vec![],
                supported: vec![],
                peer: vec![],
                curr_speed: 1_000_000,
                max_speed: 1_000_000,
            },
        }),
    );
    let bytes = round_trip(&message);
    assert_eq!(bytes.len(), 8 + 8 + 64);
    assert_eq!(bytes[8], 2);
}

#[test]
fn queue_get_config() {
    let request = of11_message(
        8,
        of11::Payload::QueueGetConfigRequest(queue::GetConfigRequestRepr {
            port: ofwire::PortNumber::Regular(2),
        }),
    );
    assert_eq!(round_trip(&request).len(), 16);

    let reply = of11_message(
        8,
        of11::Payload::QueueGetConfigReply(queue::GetConfigReplyRepr {
            port: ofwire::PortNumber::Regular(2),
            queues: vec![queue::QueueRepr {
                queue_id: 1,
                properties: vec![queue::QueueProperty::MinRate(500)],
            }],
        }),
    );
    assert_eq!(round_trip(&reply).len(), 8 + 8 + 8 + 16);
}

#[test]
fn stats_round_trips() {
    use flow_match::{FlowMatchRepr, MatchField};

    // wildcarded matches in the decoder's canonical shape: the four
    // mask-carrying slots are present with all-ones masks.
    let wildcarded = |named: Vec<MatchField>| {
        let mut fields = vec![
            MatchField::EthSrc {
                addr: EthernetAddress([0; 6]),
                mask: EthernetAddress([0xff; 6]),
            },
            MatchField::EthDst {
                addr: EthernetAddress([0; 6]),
                mask: EthernetAddress([0xff; 6]),
            },
        ];
        fields.extend(named);
        fields.push(MatchField::Ipv4Src {
            addr: Ipv4Address([0; 4]),
            mask: Ipv4Address([0xff; 4]),
        });
        fields.push(MatchField::Ipv4Dst {
            addr: Ipv4Address([0; 4]),
            mask: Ipv4Address([0xff; 4]),
        });
        FlowMatchRepr(fields)
    };

    let request = of11_message(
        9,
        of11::Payload::StatsRequest(stats::RequestRepr {
            flags: 0,
            body: stats::RequestBody::Flow(stats::FlowStatsRequest {
                table_id: 0xff,
                out_port: ofwire::PortNumber::Any,
                out_group: 0xffff_ffff,
                cookie: 0,
                cookie_mask: 0,
                flow_match: wildcarded(vec![]),
            }),
        }),
    );
    assert_eq!(round_trip(&request).len(), 8 + 8 + 120);

    let reply = of11_message(
        9,
        of11::Payload::StatsReply(stats::ReplyRepr {
            flags: 0,
            body: stats::ReplyBody::Flow(vec![stats::FlowStatsEntry {
                table_id: 0,
                duration_sec: 1,
                duration_nsec: 2,
                priority: 3,
                idle_timeout: 4,
                hard_timeout: 5,
                cookie: 6,
                packet_count: 7,
                byte_count: 8,
                flow_match: wildcarded(vec![MatchField::VlanVid(7)]),
                instructions: vec![instruction::InstructionRepr::ClearActions],
            }]),
        }),
    );
    round_trip(&reply);

    let aggregate = of11_message(
        10,
        of11::Payload::StatsReply(stats::ReplyRepr {
            flags: 0,
            body: stats::ReplyBody::Aggregate(ofwire::stats::AggregateStats {
                packet_count: 100,
                byte_count: 6400,
                flow_count: 3,
            }),
        }),
    );
    assert_eq!(round_trip(&aggregate).len(), 8 + 8 + 24);

    let table = of11_message(
        11,
        of11::Payload::StatsReply(stats::ReplyRepr {
            flags: 0,
            body: stats::ReplyBody::Table(vec![stats::TableStatsEntry {
                table_id: 0,
                name: "classifier".to_string(),
                wildcards: 0x3ff,
                match_fields: 0,
                instructions: 0,
                write_actions: 0,
                apply_actions: 0,
                config: 0,
                max_entries: 1024,
                active_count: 4,
                lookup_count: 99,
                matched_count: 98,
            }]),
        }),
    );
    assert_eq!(round_trip(&table).len(), 8 + 8 + 88);
}

#[test]
fn error_with_of13_only_type_is_rejected() {
    use ofwire::error::{ErrorMsgRepr, Header, RoleRequestFailedCode};

    let message = of11_message(
        1,
        of11::Payload::Error(ErrorMsgRepr {
            header: Header::RoleRequestFailed(RoleRequestFailedCode::Stale),
            data: vec![],
        }),
    );
    assert_eq!(encode(&message), Err(Error::BadMessage));

    // the same frame on the wire is rejected on decode.
    let bytes = [0x02, 0x01, 0x00, 0x0c, 0, 0, 0, 0, 0x00, 0x0b, 0x00, 0x00];
    assert_eq!(decode(&bytes), Err(Error::BadMessage));
}

#[test]
fn common_error_round_trips() {
    use ofwire::error::{BadMatchCode, ErrorMsgRepr, Header};

    let message = of11_message(
        1,
        of11::Payload::Error(ErrorMsgRepr {
            header: Header::BadMatch(BadMatchCode::BadField),
            data: vec![0x06, 0x0e, 0x00, 0x08],
        }),
    );
    round_trip(&message);
}

#[test]
fn unknown_message_type() {
    assert_eq!(
        decode(&[0x02, 0x18, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00]),
        Err(Error::UnknownTag)
    );
}
